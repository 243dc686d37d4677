use crate::transpiler::dialect::DialectDescriptor;

/// Standard SQL with no extensions. Every dialect-dependent function is
/// emulated, which makes this the reference rendering.
pub fn descriptor() -> DialectDescriptor {
    DialectDescriptor::new("ansi")
}
