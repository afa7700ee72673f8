//! Basic example: Building a character and reading its dice
//!
//! This example demonstrates:
//! - Selecting a background and mech bonus
//! - Reading effective dice and rank
//! - Saving the sheet as a document

use diesheet::*;

fn main() -> Result<(), SheetError> {
    let config = SheetConfig::from_env();
    let mut sheet = CharacterSheet::new(&config);

    sheet.apply(SheetAction::SetPlayerName("Rin".into()));
    sheet.apply(SheetAction::SetCharName("Vex Calder".into()));

    println!("Choosing bonuses:");
    sheet.apply(SheetAction::SelectBackground(Some(Stat::Overdrive)));
    println!("  - Background: Overdrive");
    sheet.apply(SheetAction::SelectMech(Some(MechChoice::Verdammis)));
    println!("  - Mech: {}", MechChoice::Verdammis);
    sheet.apply(SheetAction::LockBonuses);

    println!("\n=== {} ===", sheet.char_name());
    for stat in Stat::ALL {
        println!("  {:<10} {}", stat, sheet.effective_die(stat));
    }
    println!("Rank: {}", sheet.rank().code().to_uppercase());

    let json = sheet.to_document().to_json()?;
    println!("\nSaved document:\n{}", json);

    Ok(())
}
