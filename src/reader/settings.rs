//! Per-session decode configuration

use crate::symbols::Signature;

/// Platform hook deciding whether cross-module fake-override
/// reconstruction is available for a class
pub type PlatformFilter = fn(&Signature) -> bool;

fn approve_all(_: &Signature) -> bool {
    true
}

/// Configuration of one module-decode session
#[derive(Debug, Clone, Copy)]
pub struct DecodeSettings {
    /// Decode function bodies, default values and field initializers now.
    /// When off, skipped bodies become error-tagged placeholders unless a
    /// per-declaration override forces materialization.
    pub materialize_bodies: bool,
    /// In lazy mode, still materialize bodies of inline-capable functions
    pub allow_inline_bodies: bool,
    /// Decode fake-override members in place instead of deferring them to
    /// the global reconstruction pass
    pub eager_fake_overrides: bool,
    /// Accept error types and error declarations (partial-analysis inputs)
    pub allow_malformed: bool,
    /// Per-class approval for deferring fake overrides
    pub platform_fake_overrides: PlatformFilter,
}

impl Default for DecodeSettings {
    fn default() -> Self {
        Self {
            materialize_bodies: true,
            allow_inline_bodies: true,
            eager_fake_overrides: false,
            allow_malformed: false,
            platform_fake_overrides: approve_all,
        }
    }
}

impl DecodeSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_materialize_bodies(mut self, on: bool) -> Self {
        self.materialize_bodies = on;
        self
    }

    pub fn with_inline_bodies(mut self, on: bool) -> Self {
        self.allow_inline_bodies = on;
        self
    }

    pub fn with_eager_fake_overrides(mut self, on: bool) -> Self {
        self.eager_fake_overrides = on;
        self
    }

    pub fn with_allow_malformed(mut self, on: bool) -> Self {
        self.allow_malformed = on;
        self
    }

    pub fn with_platform_filter(mut self, filter: PlatformFilter) -> Self {
        self.platform_fake_overrides = filter;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = DecodeSettings::default();
        assert!(settings.materialize_bodies);
        assert!(!settings.eager_fake_overrides);
        assert!(!settings.allow_malformed);
    }

    #[test]
    fn test_builders() {
        let settings = DecodeSettings::new()
            .with_materialize_bodies(false)
            .with_inline_bodies(false)
            .with_allow_malformed(true);
        assert!(!settings.materialize_bodies);
        assert!(!settings.allow_inline_bodies);
        assert!(settings.allow_malformed);
    }
}
