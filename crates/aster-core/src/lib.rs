// Aster core IR -- the small typed representation consumed by back-ends.

mod envelope;
mod ir;
mod origin;
mod ty;

pub use envelope::{Envelope, EnvelopeError, Metadata, ENVELOPE_VERSION};
pub use ir::{
    CoreArm, CoreBackoff, CoreBlock, CoreConstraint, CoreDecl, CoreDeclKind, CoreExpr,
    CoreExprKind, CoreField, CoreFieldInit, CoreFunc, CoreModule, CoreParam, CorePattern,
    CorePatternKind, CoreRetry, CoreStep, CoreStmt, CoreStmtKind, CoreTimeout, CoreWorkflow,
    PiiSummary,
};
pub use origin::Origin;
pub use ty::{EffectRef, Type};
