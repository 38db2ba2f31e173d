//! Conversion of portable cost budgets into concrete scrypt parameters.
//!
//! The algorithm is taken from libsodium's scryptsalsa208sha256 pwhash and
//! must match it bit-for-bit: boxes only carry `(opslimit, memlimit)`, so
//! every implementation has to recover the same `(N, r, p)` triple from them
//! to decrypt each other's output.

/// Scrypt work-factor triple. Derived from the cost budgets on every call,
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScryptCost {
    log2_n: u8,
    r: u32,
    p: u32,
}

impl ScryptCost {
    /// Base-2 logarithm of the scrypt block count `N`.
    pub fn log2_n(&self) -> u8 {
        self.log2_n
    }

    /// Scrypt block size parameter.
    pub fn r(&self) -> u32 {
        self.r
    }

    /// Scrypt parallelism parameter.
    pub fn p(&self) -> u32 {
        self.p
    }
}

/// Maps `(opslimit, memlimit)` to scrypt parameters.
///
/// Pure and deterministic. Bounds are not checked here; the engine validates
/// budgets into `[MIN, MAX]` before calling. All divisions are integer floor
/// divisions, and `log2_n` is found by linear ascent rather than binary
/// search to mirror the reference exactly.
pub fn pick(opslimit: u64, memlimit: u64) -> ScryptCost {
    let r: u64 = 8;
    let log2_n;
    let p;

    if opslimit * 32 < memlimit {
        // CPU-bound regime: single lane, N limited by the ops budget.
        p = 1;
        let max_n = opslimit / (r * 4);
        log2_n = ascend(max_n);
    } else {
        // Memory-bound regime: N limited by the memory budget, remaining
        // ops budget spent on parallelism.
        let max_n = memlimit / (r * 128);
        log2_n = ascend(max_n);

        let maxrp = ((opslimit / 4) >> log2_n).min(0x3FFF_FFFF);
        p = (maxrp / r) as u32;
    }

    ScryptCost {
        log2_n,
        r: r as u32,
        p,
    }
}

/// Smallest `log2_n` in `[1, 62]` such that `2^log2_n * 2 > max_n`.
fn ascend(max_n: u64) -> u8 {
    let mut log2_n: u8 = 1;
    while log2_n < 63 {
        if (1u64 << log2_n) * 2 > max_n {
            break;
        }
        log2_n += 1;
    }
    // Unreachable for budgets within the u32 serialization bound.
    debug_assert!(log2_n < 63, "scrypt parameter ascent overflow");
    log2_n
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{DEFAULT_MEMLIMIT, DEFAULT_OPSLIMIT, MIN_MEMLIMIT, MIN_OPSLIMIT};

    #[test]
    fn interactive_defaults_pick_n14_r8_p1() {
        let cost = pick(DEFAULT_OPSLIMIT, DEFAULT_MEMLIMIT);
        assert_eq!(cost.log2_n(), 14);
        assert_eq!(cost.r(), 8);
        assert_eq!(cost.p(), 1);
    }

    #[test]
    fn cpu_bound_regime_fixes_p_to_one() {
        // opslimit * 32 < memlimit selects the CPU branch.
        let cost = pick(DEFAULT_OPSLIMIT, DEFAULT_MEMLIMIT * 2);
        assert_eq!(cost.log2_n(), 14);
        assert_eq!(cost.r(), 8);
        assert_eq!(cost.p(), 1);
    }

    #[test]
    fn memory_bound_regime_spends_ops_on_parallelism() {
        let cost = pick(DEFAULT_OPSLIMIT * 4, DEFAULT_MEMLIMIT);
        assert_eq!(cost.log2_n(), 14);
        assert_eq!(cost.r(), 8);
        // maxrp = (2097152 / 4) / 2^14 = 32, p = 32 / 8.
        assert_eq!(cost.p(), 4);
    }

    #[test]
    fn minimum_budgets_stay_cheap() {
        let cost = pick(MIN_OPSLIMIT, MIN_MEMLIMIT);
        assert_eq!(cost.log2_n(), 10);
        assert_eq!(cost.p(), 1);
    }

    #[test]
    fn maximum_budgets_terminate_within_bounds() {
        let cost = pick(u32::MAX as u64, u32::MAX as u64);
        assert!(cost.log2_n() < 63);
        assert!(u64::from(cost.r()) * u64::from(cost.p()) < 1 << 30);
    }

    #[test]
    fn picker_is_deterministic() {
        assert_eq!(pick(524_288, 16_777_216), pick(524_288, 16_777_216));
    }
}
