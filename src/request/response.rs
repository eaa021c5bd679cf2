use serde::{Deserialize, Serialize};

/// The uniform envelope every call resolves to.
///
/// `code` is the status the transport returned on the attempt that finished
/// the call, and `msg` is its canonical reason phrase (empty for unknown
/// codes). Non-2xx statuses resolve normally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub code: u16,
    pub msg: String,
}

impl<T> ApiResponse<T> {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            data: f(self.data),
            code: self.code,
            msg: self.msg,
        }
    }
}
