use log::debug;
use zeroize::Zeroizing;

use crate::error::CostError;

/// Largest `r * p` product scrypt accepts (exclusive).
pub const MAX_RP: u64 = 1 << 30;

/// Output length handed to `scrypt::Params`. Only used by its PHC encoder;
/// the real output length is the caller's buffer.
const PARAMS_LEN: usize = 32;

/// scrypt cost parameters.
///
/// Values are stored verbatim; hash codecs carry invalid parameters through
/// unchanged and only [`CostParams::validate`] rejects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostParams {
    n: u64,
    r: u32,
    p: u32,
}

impl Default for CostParams {
    fn default() -> Self {
        Self {
            // 2^14 blocks
            n: 16384,
            r: 8,
            p: 1,
        }
    }
}

impl CostParams {
    pub fn new(n: u64, r: u32, p: u32) -> Self {
        Self { n, r, p }
    }

    /// Work factor (CPU/memory cost).
    pub fn n(&self) -> u64 {
        self.n
    }

    /// Block size factor.
    pub fn r(&self) -> u32 {
        self.r
    }

    /// Parallelization factor.
    pub fn p(&self) -> u32 {
        self.p
    }

    pub fn validate(&self) -> Result<(), CostError> {
        if self.n <= 1 || !self.n.is_power_of_two() {
            return Err(CostError::InvalidWorkFactor(self.n));
        }
        if self.r == 0 || self.p == 0 || u64::from(self.r) * u64::from(self.p) >= MAX_RP {
            return Err(CostError::InvalidBlockParallel {
                r: self.r,
                p: self.p,
            });
        }
        Ok(())
    }

    /// Bytes scrypt allocates for these parameters, `None` on overflow.
    pub fn memory_required(&self) -> Option<u64> {
        let block = 128u64.checked_mul(u64::from(self.r))?;
        let blocks = self.n.checked_add(u64::from(self.p))?;
        block.checked_mul(blocks)
    }
}

/// A password-based key derivation function.
///
/// Implementations must be pure: the same inputs always produce the same key.
pub trait KeyDerivation: Send + Sync {
    fn derive(
        &self,
        password: &[u8],
        salt: &[u8],
        params: &CostParams,
        len: usize,
    ) -> Result<Zeroizing<Vec<u8>>, CostError>;
}

/// Memory ceiling applied when none is configured: 1 GiB.
pub const DEFAULT_MEMORY_LIMIT: u64 = 1 << 30;

/// scrypt as implemented by the RustCrypto `scrypt` crate.
///
/// Derivations needing more than [`Scrypt::memory_limit`] bytes are refused
/// with [`CostError::ResourceExhausted`] before anything is allocated.
#[derive(Debug, Clone, Copy)]
pub struct Scrypt {
    memory_limit: u64,
}

impl Default for Scrypt {
    fn default() -> Self {
        Self {
            memory_limit: DEFAULT_MEMORY_LIMIT,
        }
    }
}

impl Scrypt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuses derivations that would allocate more than `bytes`.
    pub fn with_memory_limit(bytes: u64) -> Self {
        Self {
            memory_limit: bytes,
        }
    }

    pub fn memory_limit(&self) -> u64 {
        self.memory_limit
    }
}

impl KeyDerivation for Scrypt {
    fn derive(
        &self,
        password: &[u8],
        salt: &[u8],
        params: &CostParams,
        len: usize,
    ) -> Result<Zeroizing<Vec<u8>>, CostError> {
        params.validate()?;
        if len == 0 {
            return Err(CostError::InvalidOutputLength(len));
        }

        let memory = params
            .memory_required()
            .filter(|m| usize::try_from(*m).is_ok_and(|m| m <= isize::MAX as usize))
            .ok_or(CostError::ResourceExhausted)?;
        if memory > self.memory_limit {
            debug!("refusing {memory} byte derivation, limit is {}", self.memory_limit);
            return Err(CostError::ResourceExhausted);
        }

        // validated power of two, so the exponent is below 64
        let log_n = params.n().trailing_zeros() as u8;
        let scrypt_params = scrypt::Params::new(log_n, params.r(), params.p(), PARAMS_LEN)
            .map_err(|_| CostError::InvalidWorkFactor(params.n()))?;

        debug!(
            "deriving {len} byte key with N={} r={} p={} ({memory} bytes)",
            params.n(),
            params.r(),
            params.p()
        );

        let mut key = Zeroizing::new(vec![0u8; len]);
        scrypt::scrypt(password, salt, &scrypt_params, &mut key)
            .map_err(|_| CostError::InvalidOutputLength(len))?;

        Ok(key)
    }
}
