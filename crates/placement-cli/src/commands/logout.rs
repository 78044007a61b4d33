//! The `placement logout` command.

use anyhow::Result;

use placement_client::SessionStore;

pub fn execute() -> Result<()> {
    let store = SessionStore::default_location();
    if store.clear()? {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}
