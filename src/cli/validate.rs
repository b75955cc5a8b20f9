//! Palette validation command implementation.

use super::CliError;
use mindmatch::game::GameConfig;
use mindmatch::palette::Palette;
use std::path::PathBuf;

/// Execute the validate command.
///
/// # Errors
///
/// Returns an error if the directory cannot be used as a palette for
/// the given configuration.
pub(crate) fn execute(dir: PathBuf, grid_size: u16, traps: u16) -> Result<(), CliError> {
    let config = GameConfig {
        grid_size,
        trap_count: traps,
        ..GameConfig::default()
    };

    println!("Validating: {}", dir.display());
    println!(
        "Target: {grid_size}x{grid_size} grid, {traps} trap tiles ({} faces required)",
        config.required_faces()
    );
    println!();

    // The grid itself must be playable before assets matter
    let grid_ok = config.is_valid();
    print_check("Grid configuration", grid_ok);
    if !grid_ok {
        return Err(CliError::new(format!(
            "A {grid_size}x{grid_size} grid with {traps} traps leaves no even number of face cells"
        )));
    }

    let palette = Palette::from_dir(&dir)?;

    let faces_ok = palette.face_count() >= config.required_faces();
    print_check(
        &format!(
            "Face images ({} found, {} required)",
            palette.face_count(),
            config.required_faces()
        ),
        faces_ok,
    );
    if !faces_ok {
        return Err(CliError::new(format!(
            "Not enough face images: found {}, need {}",
            palette.face_count(),
            config.required_faces()
        )));
    }

    if traps > 0 {
        let trap_ok = palette.has_trap();
        print_check("Trap asset (bomb.*)", trap_ok);
        if !trap_ok {
            return Err(CliError::new(
                "Traps are enabled but the directory has no bomb image",
            ));
        }
    }

    println!();
    println!("Summary:");
    println!("  Faces found:  {}", palette.face_count());
    for asset in palette.faces().iter().take(8) {
        println!("    {} ({})", asset.name, asset.glyph);
    }
    if palette.face_count() > 8 {
        println!("    ... and {} more", palette.face_count() - 8);
    }
    if let Some(trap) = palette.trap() {
        println!("  Trap asset:   {}", trap.name);
    }

    println!();
    println!("Validation successful!");

    Ok(())
}

fn print_check(name: &str, ok: bool) {
    let status = if ok { "OK" } else { "FAILED" };
    let symbol = if ok { "✓" } else { "✗" };
    println!("  {symbol} {name}: {status}");
}
