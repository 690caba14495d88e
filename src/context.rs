// context.rs
//
// Rounding context: mode, tininess policy, and the append-only logs
// every top-level arithmetic call writes into.

use std::ops::BitOr;

/// IEEE 754 rounding mode. Only the four modes the soft-float core
/// round-and-pack procedures understand; `NearestEven` is the default
/// used when a `Context` is constructed with [`Context::new`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RoundingMode {
    #[default]
    NearestEven,
    TowardZero,
    TowardNegative,
    TowardPositive,
}

/// Tininess-detection policy: whether a result is considered "tiny"
/// (eligible to raise Underflow) based on its unbounded-exponent value
/// before rounding, or on the already-rounded value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Tininess {
    #[default]
    BeforeRounding,
    AfterRounding,
}

/// A tag written by each top-level arithmetic entry point, never by
/// the internal `*_sig` helpers. Lets a caller replay which operations
/// a `Context` has seen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Add,
    Sub,
    Mul,
    Div,
}

/// One set of IEEE 754 exception flags, raised together by a single
/// rounding decision. Represented as a struct of booleans (rather than
/// a raw bitmask) so combining flags reads as plain field assignment;
/// [`BitOr`] is still provided since a logged entry is conceptually a
/// bitwise-OR of named flags, and `a | b` composing two partially-set
/// `Exceptions` values is how call sites build one.
///
/// Bit meaning: Invalid=1, Inexact=2, Underflow=4, Overflow=8,
/// DivideByZero=16. No separate "Denormal" flag is carried — this
/// crate has no sixth flag, `divide_by_zero` is the only name for that
/// condition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Exceptions {
    pub invalid: bool,
    pub inexact: bool,
    pub underflow: bool,
    pub overflow: bool,
    pub divide_by_zero: bool,
}

impl Exceptions {
    pub const INVALID: Exceptions = Exceptions {
        invalid: true,
        ..Exceptions::NONE
    };
    pub const INEXACT: Exceptions = Exceptions {
        inexact: true,
        ..Exceptions::NONE
    };
    pub const UNDERFLOW: Exceptions = Exceptions {
        underflow: true,
        ..Exceptions::NONE
    };
    pub const OVERFLOW: Exceptions = Exceptions {
        overflow: true,
        ..Exceptions::NONE
    };
    pub const DIVIDE_BY_ZERO: Exceptions = Exceptions {
        divide_by_zero: true,
        ..Exceptions::NONE
    };
    const NONE: Exceptions = Exceptions {
        invalid: false,
        inexact: false,
        underflow: false,
        overflow: false,
        divide_by_zero: false,
    };

    /// True if no flag in this set is raised.
    pub fn is_empty(&self) -> bool {
        *self == Exceptions::NONE
    }
}

impl BitOr for Exceptions {
    type Output = Exceptions;

    fn bitor(self, rhs: Exceptions) -> Exceptions {
        Exceptions {
            invalid: self.invalid || rhs.invalid,
            inexact: self.inexact || rhs.inexact,
            underflow: self.underflow || rhs.underflow,
            overflow: self.overflow || rhs.overflow,
            divide_by_zero: self.divide_by_zero || rhs.divide_by_zero,
        }
    }
}

/// Caller-owned, mutable rounding context threaded through every
/// arithmetic call.
///
/// A `Context` is a unit of ownership: at most one caller drives any
/// core operation against a given instance at a time, and two
/// `Context`s never share storage (see [`Context::fork`]). The core
/// only appends to `exceptions`/`operations`; it never reads back what
/// it has written, and it never clears a previously raised flag.
#[derive(Clone, Debug)]
pub struct Context {
    round: RoundingMode,
    tininess: Tininess,
    roundings: u64,
    exceptions: Vec<Exceptions>,
    operations: Vec<Operation>,
}

impl Context {
    /// Constructs a fresh context: empty logs, zeroed rounding counter.
    pub fn new(round: RoundingMode, tininess: Tininess) -> Self {
        Context {
            round,
            tininess,
            roundings: 0,
            exceptions: Vec::new(),
            operations: Vec::new(),
        }
    }

    /// Sets the rounding mode, builder-style.
    pub fn with_round(mut self, round: RoundingMode) -> Self {
        self.round = round;
        self
    }

    /// Sets the tininess-detection policy, builder-style.
    pub fn with_tininess(mut self, tininess: Tininess) -> Self {
        self.tininess = tininess;
        self
    }

    pub fn round(&self) -> RoundingMode {
        self.round
    }

    pub fn tininess(&self) -> Tininess {
        self.tininess
    }

    pub fn roundings(&self) -> u64 {
        self.roundings
    }

    pub fn exceptions(&self) -> &[Exceptions] {
        &self.exceptions
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Appends one exception-flag set to the log. Purely additive:
    /// never clears a flag raised by an earlier call.
    pub(crate) fn raise(&mut self, exc: Exceptions) {
        self.exceptions.push(exc);
    }

    /// Increments the rounding counter; called whenever a
    /// round-and-pack procedure observes nonzero guard/round/sticky
    /// bits, independent of whether that roundoff was ultimately
    /// reported as Inexact.
    pub(crate) fn note_rounding(&mut self) {
        self.roundings += 1;
    }

    /// Records a top-level operation tag. Only the four public
    /// entry points (`add`/`sub`/`mul`/`div`) call this, never their
    /// internal `*_sig` helpers.
    pub(crate) fn note_operation(&mut self, op: Operation) {
        self.operations.push(op);
    }

    /// Produces a child context with the same rounding mode and
    /// tininess policy but empty logs, for computations (like
    /// `Real32`'s error propagation) that must not pollute the
    /// caller-visible trace.
    pub fn fork(&self) -> Context {
        Context::new(self.round, self.tininess)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_context_is_nearest_even_before_rounding() {
        let ctx = Context::new(RoundingMode::default(), Tininess::default());
        assert_eq!(ctx.round(), RoundingMode::NearestEven);
        assert_eq!(ctx.tininess(), Tininess::BeforeRounding);
        assert_eq!(ctx.roundings(), 0);
        assert!(ctx.exceptions().is_empty());
        assert!(ctx.operations().is_empty());
    }

    #[test]
    fn fork_copies_mode_not_logs() {
        let mut ctx = Context::new(RoundingMode::TowardPositive, Tininess::AfterRounding);
        ctx.raise(Exceptions::INVALID);
        ctx.note_operation(Operation::Add);

        let child = ctx.fork();
        assert_eq!(child.round(), RoundingMode::TowardPositive);
        assert_eq!(child.tininess(), Tininess::AfterRounding);
        assert!(child.exceptions().is_empty());
        assert!(child.operations().is_empty());
    }

    #[test]
    fn exceptions_bitor_combines_flags() {
        let combined = Exceptions::OVERFLOW | Exceptions::INEXACT;
        assert!(combined.overflow && combined.inexact);
        assert!(!combined.invalid && !combined.underflow && !combined.divide_by_zero);
    }
}
