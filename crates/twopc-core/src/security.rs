//! Security-level tags for protocol roles
//!
//! Every role is tagged at the type level with the adversary it defends
//! against. `Privacy` roles only run algebraic membership checks. `Malicious`
//! roles also run every proof step, and can only be built by handing over the
//! proof system they use.

/// Adversary model a role defends against
pub trait SecurityLevel: Send + Sync {
    /// Name used in logs
    const NAME: &'static str;
    /// Whether the role runs proof verification steps
    const MALICIOUS: bool;
}

/// Marker for roles proven secure in the stand-alone model
pub trait StandAlone {}

/// Ties a role to its security level
pub trait SecuredRole: StandAlone {
    /// Level the role is instantiated at
    type Level: SecurityLevel;
}

/// Privacy only: the honest party's input stays hidden, correctness is not enforced
#[derive(Debug, Clone, Copy, Default)]
pub struct Privacy;

impl SecurityLevel for Privacy {
    const NAME: &'static str = "privacy";
    const MALICIOUS: bool = false;
}

/// Security against malicious adversaries, carrying the proof collaborator `Z`
#[derive(Debug, Clone)]
pub struct Malicious<Z> {
    proofs: Z,
}

impl<Z> Malicious<Z> {
    /// Tag a role as malicious-secure using `proofs` for its proof steps
    pub fn new(proofs: Z) -> Self {
        Self { proofs }
    }

    /// The proof collaborator
    pub fn proofs(&self) -> &Z {
        &self.proofs
    }
}

impl<Z: Send + Sync> SecurityLevel for Malicious<Z> {
    const NAME: &'static str = "malicious";
    const MALICIOUS: bool = true;
}
