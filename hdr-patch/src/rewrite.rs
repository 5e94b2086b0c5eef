//! The `Database.conn` rewrite rule.
//!
//! cbindgen has no C spelling for `Arc<Mutex<PgConnection>>`, so it emits
//! the member as `struct Arc_Mutex_PgConnection conn;`, a type that is never
//! declared anywhere in the header. C callers only ever hold the connection
//! through a `Database*`, so the member is turned into an opaque `void*`.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{debug, warn};

/// One `typedef struct Database { ... } Database;` block, newlines included.
/// The body is matched lazily so adjacent blocks are never merged.
static DATABASE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)typedef\s+struct\s+Database\s*\{.*?\}\s*Database;")
        .expect("Database block pattern is valid")
});

/// The connection member as cbindgen spells it.
static CONN_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"struct\s+Arc_Mutex_PgConnection\s+conn;").expect("conn field pattern is valid")
});

/// Replacement text for [`CONN_FIELD`].
pub const OPAQUE_CONN_FIELD: &str = "void* conn;";

/// What a single pass of [`rewrite_header`] found and changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchReport {
    /// Number of `Database` struct blocks in the header.
    pub structs_matched: usize,
    /// Number of `conn` members converted to `void*`.
    pub fields_rewritten: usize,
}

impl PatchReport {
    /// True when the output differs from the input.
    pub fn changed(&self) -> bool {
        self.fields_rewritten > 0
    }
}

/// Rewrite every `Database` block in `content`, leaving all other bytes
/// untouched.
///
/// A header without the block, or a block without the member, comes back
/// unchanged. Neither case is an error.
pub fn rewrite_header(content: &str) -> (String, PatchReport) {
    let mut report = PatchReport::default();

    let rewritten = DATABASE_BLOCK.replace_all(content, |caps: &Captures<'_>| {
        let block = &caps[0];
        report.structs_matched += 1;

        let fields = CONN_FIELD.find_iter(block).count();
        if fields == 0 {
            debug!(block_len = block.len(), "Database block has no conn field to rewrite");
            return block.to_string();
        }
        report.fields_rewritten += fields;
        CONN_FIELD.replace_all(block, OPAQUE_CONN_FIELD).into_owned()
    });

    if report.structs_matched == 0 {
        warn!("no `typedef struct Database` block found, header left unchanged");
    }

    (rewritten.into_owned(), report)
}
