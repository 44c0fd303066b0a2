//! The read-dispatch loop and the give / takeback / newfriend flows

use std::io::{BufRead, Write};
use owo_colors::OwoColorize;
use super::Command;
use crate::friend::{Friend, FriendId};
use crate::storage::SqliteStore;
use crate::ui::{theme, Theme};
use crate::{Error, Result};

const MENU: &str = "What do you want to do? (takeback/give/newfriend/quit)";
const USAGE: &str = "Sorry, I didn't understand that. (Valid choices: give/takeback/newfriend/quit)";
const NO_FRIENDS: &str = "You don't have any friends in the system yet. Add a friend first.";

/// One interactive session over a store.
///
/// Generic over its input and output so the same code drives a terminal and
/// an in-memory transcript.
pub struct Session<'a, R, W> {
    store: &'a SqliteStore,
    input: R,
    output: W,
    theme: Theme,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(store: &'a SqliteStore, input: R, output: W) -> Self {
        Self {
            store,
            input,
            output,
            theme: theme().clone(),
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run until `quit` or end of input.
    ///
    /// Only failures to read or write the terminal are returned; everything
    /// the store reports is shown to the user instead.
    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "{}", MENU.style(self.theme.menu.clone()))?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                tracing::debug!("end of input, leaving session");
                break;
            };

            match line.parse::<Command>() {
                Ok(Command::Quit) => {
                    writeln!(self.output, "Goodbye!")?;
                    break;
                }
                Ok(Command::Give) => self.give()?,
                Ok(Command::TakeBack) => self.take_back()?,
                Ok(Command::NewFriend) => self.new_friend()?,
                Err(_) => writeln!(self.output, "{}", USAGE.style(self.theme.refusal.clone()))?,
            }
        }

        self.output.flush()?;
        Ok(())
    }

    fn new_friend(&mut self) -> Result<()> {
        let name = self.prompt("Who is your new friend? ")?;
        if name.is_empty() {
            return self.fail("Friend name cannot be empty.");
        }

        match self.store.create_friend(&name) {
            Ok(id) => {
                tracing::debug!("created friend {} ({})", id, name);
                self.ok(&format!("Great! I've added {} as your friend.", name))
            }
            Err(Error::Conflict(_)) => self.fail("That friend already exists."),
            Err(e) => self.fail(&format!("Error adding friend: {}", e)),
        }
    }

    fn give(&mut self) -> Result<()> {
        if self.show_friends()?.is_none() {
            return Ok(());
        }

        let friend_name = self.prompt("Which friend did you lend to? ")?;
        let Some(friend_id) = self.resolve_friend(&friend_name)? else {
            return Ok(());
        };

        let item_name = self.prompt(&format!("What did you lend to {}? ", friend_name))?;
        if item_name.is_empty() {
            return self.fail("Item name cannot be empty.");
        }

        match self.store.create_item(&item_name, friend_id) {
            Ok(id) => {
                tracing::debug!("lent item {} ({}) to friend {}", id, item_name, friend_id);
                self.ok(&format!("Got it! You lent {} to {}.", item_name, friend_name))
            }
            Err(e) => self.fail(&format!("Error adding item: {}", e)),
        }
    }

    fn take_back(&mut self) -> Result<()> {
        if self.show_friends()?.is_none() {
            return Ok(());
        }

        let friend_name = self.prompt("Which friend did you lend to? ")?;
        let Some(friend_id) = self.resolve_friend(&friend_name)? else {
            return Ok(());
        };

        let items = match self.store.list_items_for_friend(friend_id) {
            Ok(items) => items,
            Err(e) => return self.fail(&format!("Error fetching items: {}", e)),
        };

        writeln!(self.output, "This is what you gave to {}:", friend_name)?;
        for item in &items {
            writeln!(self.output, "{}", item.name.style(self.theme.listing.clone()))?;
        }
        if items.is_empty() {
            writeln!(self.output, "You haven't given anything to {}", friend_name)?;
            return Ok(());
        }

        let item_name = self.prompt(&format!("What did you take back from {}? ", friend_name))?;
        let item_id = match self.store.find_item_id_by_name_and_friend(&item_name, friend_id) {
            Ok(id) => id,
            Err(Error::NotFound(_)) => return self.fail("Sorry, I didn't find that item."),
            Err(e) => return self.fail(&format!("Error fetching item: {}", e)),
        };

        match self.store.delete_item(item_id) {
            Ok(()) => self.ok(&format!(
                "Alright, I'll remember that you took {} from {}",
                item_name, friend_name
            )),
            Err(e) => self.fail(&format!("Error deleting item: {}", e)),
        }
    }

    /// Print every friend's name. `None` means the flow should stop: either
    /// there is nobody to pick or the store failed (already reported).
    fn show_friends(&mut self) -> Result<Option<Vec<Friend>>> {
        let friends = match self.store.list_friends() {
            Ok(friends) => friends,
            Err(e) => {
                self.fail(&format!("Error fetching friends: {}", e))?;
                return Ok(None);
            }
        };

        writeln!(self.output, "These are your friends:")?;
        for friend in &friends {
            writeln!(self.output, "{}", friend.name.style(self.theme.listing.clone()))?;
        }

        if friends.is_empty() {
            writeln!(self.output, "{}", NO_FRIENDS)?;
            return Ok(None);
        }
        Ok(Some(friends))
    }

    fn resolve_friend(&mut self, name: &str) -> Result<Option<FriendId>> {
        match self.store.find_friend_id_by_name(name) {
            Ok(id) => Ok(Some(id)),
            Err(Error::NotFound(_)) => {
                self.fail("Sorry, I didn't find that friend.")?;
                Ok(None)
            }
            Err(e) => {
                self.fail(&format!("Error fetching friend: {}", e))?;
                Ok(None)
            }
        }
    }

    /// Show a question without a newline and read the trimmed answer.
    /// End of input reads as an empty answer.
    fn prompt(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{}", question.style(self.theme.question.clone()))?;
        self.output.flush()?;
        Ok(self.read_line()?.unwrap_or_default())
    }

    /// Bytes that are not UTF-8 are replaced rather than rejected, so a
    /// mistyped line is answered like any other unknown input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&buf).trim().to_string()))
    }

    fn ok(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{}", message.style(self.theme.done.clone()))?;
        Ok(())
    }

    fn fail(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{}", message.style(self.theme.refusal.clone()))?;
        Ok(())
    }
}
