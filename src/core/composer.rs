//! Builds the final message text: `"[<instance>] " + body`

use super::handle::{RuntimeEnv, ThreadCheck};
use super::thread_gate::ThreadIntegrityGate;
use std::ffi::{CStr, CString};
use std::fmt::{self, Write};

/// Headroom reserved for a formatted body before the buffer has to grow
const FORMATTED_BODY_HINT: usize = 128;

/// Composes instance-prefixed messages.
///
/// Every entry first passes the thread gate with the caller's `check`, then
/// resolves the instance name with the same `check`. This is the only place
/// the facade runs the gate.
pub struct MessageComposer;

impl MessageComposer {
    /// Direct shape: the body is used verbatim
    pub fn compose<E: RuntimeEnv + ?Sized>(env: &E, check: ThreadCheck, body: &str) -> String {
        ThreadIntegrityGate::enforce(env, check);
        let name = env.attached_instance_name(check);

        let mut message = String::with_capacity(Self::prefix_len(&name) + body.len());
        Self::push_prefix(&mut message, &name);
        message.push_str(body);
        message
    }

    /// Direct shape for NUL-terminated input, kept NUL-terminated for the
    /// plain dispatch form
    pub fn compose_cstr<E: RuntimeEnv + ?Sized>(
        env: &E,
        check: ThreadCheck,
        body: &CStr,
    ) -> CString {
        ThreadIntegrityGate::enforce(env, check);
        let name = env.attached_instance_name(check);
        let body = body.to_bytes();

        let mut bytes = Vec::with_capacity(Self::prefix_len(&name) + body.len() + 1);
        bytes.push(b'[');
        bytes.extend(name.bytes().filter(|b| *b != 0));
        bytes.extend_from_slice(b"] ");
        bytes.extend_from_slice(body);

        // Body came from a CStr and NULs were filtered out of the name.
        CString::new(bytes).unwrap_or_default()
    }

    /// Formatted shape: the body is expanded into a growable buffer and is
    /// never truncated
    pub fn compose_formatted<E: RuntimeEnv + ?Sized>(
        env: &E,
        check: ThreadCheck,
        args: fmt::Arguments<'_>,
    ) -> String {
        ThreadIntegrityGate::enforce(env, check);
        let name = env.attached_instance_name(check);

        let mut message = String::with_capacity(Self::prefix_len(&name) + FORMATTED_BODY_HINT);
        Self::push_prefix(&mut message, &name);
        if message.write_fmt(args).is_err() {
            // Only a failing Display impl gets here; keep what it produced.
            message.push_str("<formatting error>");
        }
        message
    }

    #[inline]
    fn prefix_len(name: &str) -> usize {
        name.len() + 3
    }

    #[inline]
    fn push_prefix(message: &mut String, name: &str) {
        message.push('[');
        message.push_str(name);
        message.push_str("] ");
    }
}
