//! Interception primitives
//!
//! Named-member interception over the document's mutation entry points,
//! grouped into a reversible instrumentation session. Installation and
//! restoration are symmetric: every interception is paired with exactly
//! one removal, and a session restores at most once.

use thiserror::Error;

use announce_dom::{Document, EntryPoint, Hook, HookId};

/// Interception setup failures
///
/// These indicate a mismatch between the instrumentation and the DOM
/// API surface and abort setup immediately.
#[derive(Debug, Error)]
pub enum InterceptError {
    /// The named member is not an interceptable method
    #[error("expected {member} to be a method entry point")]
    InvalidTarget { member: String },

    /// The named property has no setter to intercept
    #[error("unable to intercept {property}: no accessor descriptor available")]
    NoAccessorDescriptor { property: String },

    /// A session was installed twice without an intervening restore
    #[error("instrumentation session is already installed")]
    AlreadyInstalled,
}

/// Intercept calls to the named mutation method
///
/// The original behavior always runs first; `observer` is invoked with
/// the post-mutation document and the mutation record.
pub fn intercept_method(
    doc: &mut Document,
    member: &str,
    observer: Hook,
) -> Result<HookId, InterceptError> {
    let point = EntryPoint::parse(member).filter(|p| !p.is_setter()).ok_or_else(|| {
        InterceptError::InvalidTarget {
            member: member.to_string(),
        }
    })?;
    Ok(doc.add_hook(point, observer))
}

/// Intercept assignments through the named property setter
pub fn intercept_setter(
    doc: &mut Document,
    property: &str,
    observer: Hook,
) -> Result<HookId, InterceptError> {
    let point = EntryPoint::parse(property).filter(|p| p.is_setter()).ok_or_else(|| {
        InterceptError::NoAccessorDescriptor {
            property: property.to_string(),
        }
    })?;
    Ok(doc.add_hook(point, observer))
}

/// A set of installed interceptions, reversible as a unit
///
/// Collects hook ids as they are installed so that a failure partway
/// through setup (or a later teardown) removes everything that made it
/// in. `restore` is a no-op after the first call.
#[derive(Debug, Default)]
pub struct InstrumentationSession {
    installed: Vec<HookId>,
    restored: bool,
}

impl InstrumentationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a method interception into this session
    pub fn method(
        &mut self,
        doc: &mut Document,
        member: &str,
        observer: Hook,
    ) -> Result<(), InterceptError> {
        let id = intercept_method(doc, member, observer)?;
        self.installed.push(id);
        Ok(())
    }

    /// Install a setter interception into this session
    pub fn setter(
        &mut self,
        doc: &mut Document,
        property: &str,
        observer: Hook,
    ) -> Result<(), InterceptError> {
        let id = intercept_setter(doc, property, observer)?;
        self.installed.push(id);
        Ok(())
    }

    /// Number of interceptions currently held by the session
    pub fn len(&self) -> usize {
        self.installed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.installed.is_empty()
    }

    /// Remove every interception installed through this session
    ///
    /// Guarded against double-restore: only the first call removes
    /// hooks.
    pub fn restore(&mut self, doc: &mut Document) {
        if self.restored {
            return;
        }
        self.restored = true;
        for id in self.installed.drain(..) {
            doc.remove_hook(id);
        }
        tracing::debug!("instrumentation session restored");
    }
}
