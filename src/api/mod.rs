pub mod fragment;
pub mod operation;
pub mod request;

pub use fragment::Fragment;
pub use operation::{
    ERROR_TRANSITION, FragmentOperation, FragmentResult, OperationError, SUCCESS_TRANSITION,
};
pub use request::{ClientRequest, FragmentContext};
