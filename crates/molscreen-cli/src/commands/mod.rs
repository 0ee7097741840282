pub mod classify;
pub mod conformers;

use molscreen::engine::outcome::SkippedEntity;

pub(crate) fn print_summary(written: usize, skipped: &[SkippedEntity]) {
    println!("Written: {}, skipped: {}", written, skipped.len());
    for entity in skipped {
        println!("  - {}", entity);
    }
}
