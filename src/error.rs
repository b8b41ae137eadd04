use std::fmt::Display;

#[derive(Debug)]
pub enum Error {
    Decode(String, image::ImageError),
    Encode(String, image::ImageError),
    InputFileNotFound(String),
    UnableToResolveAssetDirectory(std::io::Error),
    UnableToWriteStatus(std::io::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode(path, error) => {
                write!(f, "Unable to decode input image '{}': {}", path, error)
            }
            Self::Encode(path, error) => {
                write!(f, "Unable to write output image '{}': {}", path, error)
            }
            Self::InputFileNotFound(path) => {
                write!(f, "Input file '{}' not found", path)
            }
            Self::UnableToResolveAssetDirectory(error) => {
                write!(
                    f,
                    "Unable to resolve the directory of the running executable: {}",
                    error
                )
            }
            Self::UnableToWriteStatus(error) => {
                write!(f, "Unable to write status output: {}", error)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode(_, error) | Self::Encode(_, error) => Some(error),
            Self::UnableToResolveAssetDirectory(error) | Self::UnableToWriteStatus(error) => {
                Some(error)
            }
            Self::InputFileNotFound(_) => None,
        }
    }
}
