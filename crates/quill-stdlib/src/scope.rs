//! `[savefmt]` and `[restorefmt]`

use quill::dispatch::{Handler, Input};
use quill::error::Error;
use quill::token::Token;
use quill::traits::*;

pub const SAVE_FORMAT_DOC: &str = "Save the current format";
pub const RESTORE_FORMAT_DOC: &str = "Restore the last saved format";

/// Get the `[savefmt]` handler.
pub fn get_save_format<S: State>() -> Handler<S> {
    Handler::new(save_format_fn).with_doc(SAVE_FORMAT_DOC)
}

fn save_format_fn<S: State>(_: &Token, input: &mut Input<S>) -> Result<usize, Error> {
    input.formats_mut().save_current_format();
    Ok(0)
}

/// Get the `[restorefmt]` handler.
///
/// Restoring with no saved format resets the format to the document defaults.
pub fn get_restore_format<S: State>() -> Handler<S> {
    Handler::new(restore_format_fn).with_doc(RESTORE_FORMAT_DOC)
}

fn restore_format_fn<S: State>(token: &Token, input: &mut Input<S>) -> Result<usize, Error> {
    restore(token, input);
    Ok(0)
}

/// Restores the last saved format.
///
/// Once output is open the margins and page size are frozen,
///     so the live values survive the restore.
pub(crate) fn restore<S: State>(token: &Token, input: &mut Input<S>) {
    if !input.formats().has_saved_format() {
        input.info(token.source(), "info.format_restored_at_bottom");
    }
    let frozen = if input.state().is_output_open() {
        let current = input.formats().current();
        Some((current.margins, current.page))
    } else {
        None
    };
    let formats = input.formats_mut();
    formats.restore_last_format();
    if let Some((margins, page)) = frozen {
        let current = formats.current_mut();
        current.margins = margins;
        current.page = page;
    }
}
