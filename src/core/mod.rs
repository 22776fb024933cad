// Pipeline stages, leaves first
pub mod validation {
    pub use crate::validation::*;
}

pub mod enrichment {
    pub use crate::enrichment::*;
}

pub mod scoring {
    pub use crate::scoring::*;
}

pub mod routing {
    pub use crate::routing::*;
}

pub mod intent {
    pub use crate::intent::*;
}

pub mod pipeline {
    pub use crate::pipeline::*;
}
