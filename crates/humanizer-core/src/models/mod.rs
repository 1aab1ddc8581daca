pub mod humanize;
pub mod transfer;
pub mod upload;

pub use humanize::{
    HumanizeFileRequest, HumanizeParameters, HumanizeRequest, HumanizeResult, LengthOption,
    SimilarityOption, SourceMode, SourceText, StyleOption,
};
pub use transfer::TransferMode;
pub use upload::UploadResponse;
