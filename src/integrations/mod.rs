//! Language-model integrations.

pub mod oracle {
    pub use crate::oracle::*;
}

pub mod gemini {
    pub use crate::gemini::*;
}
