//! The parse-time registry of the built-in commands.

use quill::command::{map::InvalidRoot, Descriptor, Map};

/// Returns the parse-time command map with every built-in command, family and alias.
///
/// # Panics
///
/// Panics if a built-in command has an invalid root.
/// The built-in table is fixed, and the unit tests check that it is valid.
pub fn registry() -> Map {
    match build() {
        Ok(map) => map,
        Err(err) => panic!("the built-in command table is invalid: {err}"),
    }
}

fn build() -> Result<Map, InvalidRoot> {
    let mut map = Map::default();
    for descriptor in [
        Descriptor::new_no_param("[b]").with_doc("Begin bold text"),
        Descriptor::new_no_param("[/b]").with_doc("End bold text"),
        Descriptor::new_no_param("[i]").with_doc("Begin italic text"),
        Descriptor::new_no_param("[/i]").with_doc("End italic text"),
        Descriptor::new_no_param("[u]").with_doc("Begin underlined text"),
        Descriptor::new_no_param("[/u]").with_doc("End underlined text"),
        Descriptor::new_no_param("[x]").with_doc("Begin struck through text"),
        Descriptor::new_no_param("[/x]").with_doc("End struck through text"),
        Descriptor::new_no_param("[code]").with_doc("Begin a code section"),
        Descriptor::new_no_param("[/code]")
            .with_allowed_in_code(true)
            .with_doc("End a code section"),
        Descriptor::new_no_param("[cr]")
            .with_allowed_in_code(true)
            .with_doc("Line break"),
        Descriptor::new_no_param("[savefmt]").with_doc("Save the current format"),
        Descriptor::new_no_param("[restorefmt]").with_doc("Restore the last saved format"),
        Descriptor::new_symbol("[copyright]")
            .with_allowed_in_code(true)
            .with_doc("Copyright sign"),
        Descriptor::new_symbol("[trademark]")
            .with_allowed_in_code(true)
            .with_doc("Trademark sign"),
        Descriptor::new_symbol("[bullet]")
            .with_allowed_in_code(true)
            .with_doc("Bullet"),
        Descriptor::new_symbol("[emdash]")
            .with_allowed_in_code(true)
            .with_doc("Em dash"),
        Descriptor::new_symbol("[pg#]").with_doc("Current page number"),
        Descriptor::new_value("[leading:").with_doc("Set the distance between baselines"),
        Descriptor::new_value("[indent:").with_doc("Set the first line indent of paragraphs"),
        Descriptor::new_value("[paraskip:").with_doc("Set the space between paragraphs"),
        Descriptor::new_value("[skip:").with_doc("Add vertical space"),
        Descriptor::new_value("[lmargin:").with_doc("Set the left margin"),
        Descriptor::new_value("[rmargin:").with_doc("Set the right margin"),
        Descriptor::new_value("[tmargin:").with_doc("Set the top margin"),
        Descriptor::new_value("[bmargin:").with_doc("Set the bottom margin"),
        Descriptor::new_string("[align:").with_doc("Set the paragraph alignment"),
        Descriptor::new_string("[eol:").with_doc("Set the end-of-line treatment: soft or hard"),
        Descriptor::new_string("[url:").with_doc("Begin a hyperlink; the link text ends at [/url]"),
        Descriptor::new_no_param("[/url]").with_doc("End a hyperlink"),
    ] {
        map.insert(descriptor)?;
    }
    map.insert_family(
        "[font|",
        [
            Descriptor::new_value("size:").with_doc("Set the font size"),
            Descriptor::new_string("face:").with_doc("Set the typeface"),
            Descriptor::new_string("style:")
                .with_doc("Set the font style: plain, bold, italic or bolditalic"),
        ],
    )?;
    map.insert_family(
        "[cover|",
        [Descriptor::new_string("text:").with_doc("Set the text of the cover page")],
    )?;
    map.insert_alias("[fsize:", "[font|size:")?;
    map.insert_alias("[ff:", "[font|face:")?;
    map.insert_alias("[face:", "[font|face:")?;
    Ok(map)
}
