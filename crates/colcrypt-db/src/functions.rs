//! SQL scalar functions backing the encrypted column transforms.
//!
//! `sym_encrypt(text) -> blob`, `sym_decrypt(blob) -> text` and
//! `fold_case(text) -> text` are registered on every connection. All three
//! map NULL to NULL so that left joins without a match stay NULL.

use std::sync::Arc;

use anyhow::Result;
use colcrypt_crypto::ColumnCipher;
use rusqlite::Connection;
use rusqlite::functions::FunctionFlags;

pub const SYM_ENCRYPT: &str = "sym_encrypt";
pub const SYM_DECRYPT: &str = "sym_decrypt";
pub const FOLD_CASE: &str = "fold_case";

/// Case folding shared by stored values and search needles.
///
/// Lowercases, then folds dotless `ı` onto `i` and drops the combining dot
/// U+0307 that `İ` lowercases into, so Turkish and ASCII spellings of the
/// same name compare equal.
pub fn fold(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .filter(|&c| c != '\u{0307}')
        .map(|c| if c == 'ı' { 'i' } else { c })
        .collect()
}

pub fn register(conn: &Connection, cipher: Arc<ColumnCipher>) -> Result<()> {
    let sealer = cipher.clone();
    // Not deterministic: every call draws a fresh nonce.
    conn.create_scalar_function(SYM_ENCRYPT, 1, FunctionFlags::SQLITE_UTF8, move |ctx| {
        let Some(plaintext) = ctx.get::<Option<String>>(0)? else {
            return Ok(None);
        };
        sealer
            .seal(&plaintext)
            .map(Some)
            .map_err(|e| rusqlite::Error::UserFunctionError(Box::new(e)))
    })?;

    let opener = cipher;
    conn.create_scalar_function(
        SYM_DECRYPT,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        move |ctx| {
            let Some(sealed) = ctx.get::<Option<Vec<u8>>>(0)? else {
                return Ok(None);
            };
            opener
                .open(&sealed)
                .map(Some)
                .map_err(|e| rusqlite::Error::UserFunctionError(Box::new(e)))
        },
    )?;

    // SQLite's lower() only folds ASCII.
    conn.create_scalar_function(
        FOLD_CASE,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|s| fold(&s))),
    )?;

    Ok(())
}
