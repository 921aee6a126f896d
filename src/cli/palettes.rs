//! Palette listing

use std::process::ExitCode;

use crate::color::format_hex;
use crate::models::Archetype;
use crate::palettes::{palette_count, Palette, Role};

use super::EXIT_SUCCESS;

/// One line per palette: index followed by `role=color` pairs.
///
/// Colors are printed as resolved for drawing, so a table entry that fails
/// to parse shows up as magenta.
pub(crate) fn palette_lines(archetype: Archetype) -> Vec<String> {
    (0..palette_count(archetype))
        .map(|index| {
            let resolved = Palette::get(archetype, index).resolve();
            let colors: Vec<String> = Role::for_archetype(archetype)
                .iter()
                .map(|role| format!("{}={}", role.name(), format_hex(resolved.rgba(*role))))
                .collect();
            format!("  {:>2}  {}", index, colors.join(" "))
        })
        .collect()
}

/// Execute the palettes command
pub fn run_palettes(archetype: Option<Archetype>) -> ExitCode {
    let archetypes: Vec<Archetype> = match archetype {
        Some(a) => vec![a],
        None => Archetype::ALL.to_vec(),
    };

    for (i, archetype) in archetypes.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{} palettes ({}):", archetype, palette_count(*archetype));
        for line in palette_lines(*archetype) {
            println!("{}", line);
        }
    }
    ExitCode::from(EXIT_SUCCESS)
}
