use mb_tensor::BackendKind;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Settings shared by every benchmark invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BenchConfig {
    /// Seed for matrix generation. `None` draws a fresh seed from the OS for
    /// every run.
    pub seed: Option<u64>,
    /// Which compute backend performs the timed operation.
    pub backend: BackendKind,
}

impl BenchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// A fresh random source for one run.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
