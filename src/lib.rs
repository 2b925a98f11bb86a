pub mod archive;
pub mod candidate;
pub mod cli;
pub mod constants;
pub mod error;
pub mod info;
pub mod logger;
pub mod messages;
pub mod planner;
pub mod processing;
pub mod progress;
pub mod references;
pub mod session;
pub mod utils;
pub mod validation;

pub use archive::{build_archive, Bundle};
pub use candidate::{collect_candidate_paths, CandidateFile, FileContent};
pub use error::{CompressionError, Result};
pub use info::{get_image_info, print_image_info, ImageInfo};
pub use messages::MessageBoard;
pub use planner::{plan, CompressionPlan};
pub use processing::{compress, compressed_name, CompressedArtifact, CompressionOptions};
pub use progress::{
    BatchProgress, EventSink, IndicatifSink, NullSink, ProgressAction, RecordingSink,
    SessionEvent,
};
pub use references::{ArtifactRef, ReferenceStore};
pub use session::{BatchSummary, Session, SessionConfig};
pub use utils::{describe_artifact, format_file_size, save_artifacts, save_bundle};
pub use validation::{validate, Rejection, RejectionReason, ValidationLimits, ValidationReport};
