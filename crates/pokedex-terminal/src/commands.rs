//! Built-in Pokedex commands.

use pokedex_types::error::Result;

use crate::api::Page;
use crate::interpreter::{Command, CommandOutput, CommandRegistry, Environment};

/// Register `help`, `exit`, `map` and `mapb` into a registry.
pub fn register_builtins(reg: &mut CommandRegistry) {
    reg.register(Box::new(HelpCmd));
    reg.register(Box::new(ExitCmd));
    reg.register(Box::new(MapCmd));
    reg.register(Box::new(MapbCmd));
}

impl CommandRegistry {
    /// Registry holding exactly the built-in commands.
    pub fn pokedex() -> Self {
        let mut reg = Self::new();
        register_builtins(&mut reg);
        reg
    }
}

/// Render one name per line, in server order.
fn render_names(page: &Page) -> CommandOutput {
    if page.results.is_empty() {
        return CommandOutput::None;
    }
    let names: Vec<&str> = page.results.iter().map(|r| r.name.as_str()).collect();
    CommandOutput::Text(names.join("\n"))
}

// ---------------------------------------------------------------------------
// help
// ---------------------------------------------------------------------------

struct HelpCmd;
impl Command for HelpCmd {
    fn name(&self) -> &str {
        "help"
    }
    fn description(&self) -> &str {
        "Displays a help message"
    }
    fn execute(&self, env: &mut Environment<'_>) -> Result<CommandOutput> {
        let mut out = String::from("Welcome to the Pokedex!\nUsage:\n\n");
        for cmd in env.registry.list() {
            out.push_str(&format!("{}: {}\n", cmd.name(), cmd.description()));
        }
        Ok(CommandOutput::Text(out))
    }
}

// ---------------------------------------------------------------------------
// exit
// ---------------------------------------------------------------------------

struct ExitCmd;
impl Command for ExitCmd {
    fn name(&self) -> &str {
        "exit"
    }
    fn description(&self) -> &str {
        "Exit the Pokedex"
    }
    fn execute(&self, _env: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::Exit {
            message: "Exiting program..".to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// map / mapb
// ---------------------------------------------------------------------------

struct MapCmd;
impl Command for MapCmd {
    fn name(&self) -> &str {
        "map"
    }
    fn description(&self) -> &str {
        "List next 20 locations"
    }
    fn execute(&self, env: &mut Environment<'_>) -> Result<CommandOutput> {
        let page = env.session.advance(env.fetcher)?;
        Ok(render_names(&page))
    }
}

struct MapbCmd;
impl Command for MapbCmd {
    fn name(&self) -> &str {
        "mapb"
    }
    fn description(&self) -> &str {
        "List previous 20 locations"
    }
    fn execute(&self, env: &mut Environment<'_>) -> Result<CommandOutput> {
        let page = env.session.retreat(env.fetcher)?;
        Ok(render_names(&page))
    }
}
