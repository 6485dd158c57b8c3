//! The command tree and the parse driver.
use std::any::{TypeId, type_name};
use std::ffi::OsString;
use std::fmt;
use std::marker::PhantomData;

use crate::analyze::analyze;
use crate::ast;
use crate::condition::{Condition, Constraints, When};
use crate::error::{ConfigError, ParseError};
use crate::option::{
    Choice, Flag, MultiChoice, MultiFlag, MultiPositional, OptionKind, Positional, Slot,
};
use crate::refl::CommandInfo;
use crate::registry::{IdAllocator, Registry};
use crate::results::{Handle, Results};
use crate::token::tokenize;

/// Scope tag of the top-level command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Root {}

/// Identifies the command tagged `S` within one [`Cli`].
pub struct CommandHandle<S> {
    index: usize,
    _scope: PhantomData<fn() -> S>,
}

impl<S> Clone for CommandHandle<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for CommandHandle<S> {}

impl<S> fmt::Debug for CommandHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CommandHandle").field(&type_name::<S>()).finish()
    }
}

struct CommandNode {
    /// Names from the program name down to this command.
    path: Vec<String>,
    description: Option<String>,
    registry: Registry,
    constraints: Constraints,
    children: Vec<usize>,
    scope: TypeId,
    /// Whether this command was parsed successfully by the last run.
    succeeded: bool,
}

impl CommandNode {
    fn new(path: Vec<String>, scope: TypeId) -> Self {
        let display = path.join(" ");
        Self {
            registry: Registry::new(display),
            path,
            description: None,
            constraints: Constraints::default(),
            children: Vec::new(),
            scope,
            succeeded: false,
        }
    }

    fn name(&self) -> &str {
        self.path.last().map_or("", String::as_str)
    }

    fn display_path(&self) -> String {
        self.path.join(" ")
    }
}

/// Subcommand names are matched against whole argv items and must not look like flags.
fn check_subcommand_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        Err(ConfigError::EmptyName)
    } else if name.starts_with('-') || name.contains(char::is_whitespace) {
        Err(ConfigError::InvalidSubcommandName(name.into()))
    } else {
        Ok(())
    }
}

/// A tree of commands with their declared options.
///
/// ```
/// # use argot::{Cli, Flag, MultiPositional};
/// let mut cli = Cli::new("me");
/// let mut root = cli.command(cli.root());
/// let jobs = root.add_flag(Flag::<u16>::new("--jobs").with_alias("-j").with_default(1))?;
/// let files = root.add_multi_positional(MultiPositional::<String>::new("FILE"))?;
///
/// cli.run(["me", "-j", "4", "a", "b"])?;
/// let results = cli.try_get_results(cli.root()).unwrap();
/// assert_eq!(results.get(jobs), Some(&4));
/// assert_eq!(results.get(files), ["a", "b"]);
/// # Ok::<_, argot::Error>(())
/// ```
pub struct Cli {
    commands: Vec<CommandNode>,
    ids: IdAllocator,
}

impl fmt::Debug for Cli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.commands.iter().map(CommandNode::display_path)).finish()
    }
}

impl Cli {
    /// Create a tree with only the top-level command named `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let root = CommandNode::new(vec![name.into()], TypeId::of::<Root>());
        Self { commands: vec![root], ids: IdAllocator::default() }
    }

    /// Set the description of the top-level command.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.commands[0].description = Some(description.into());
        self
    }

    #[must_use]
    pub fn root(&self) -> CommandHandle<Root> {
        CommandHandle { index: 0, _scope: PhantomData }
    }

    fn node_index<S: 'static>(&self, cmd: CommandHandle<S>) -> Option<usize> {
        let node = self.commands.get(cmd.index)?;
        (node.scope == TypeId::of::<S>()).then_some(cmd.index)
    }

    #[track_caller]
    fn expect_node<S: 'static>(&self, cmd: CommandHandle<S>) -> usize {
        match self.node_index(cmd) {
            Some(index) => index,
            None => panic!("command `{}` does not belong to this Cli", type_name::<S>()),
        }
    }

    /// Register a subcommand of `parent`, tagged with the scope type `S`.
    ///
    /// Each scope tag may be used by only one command of the tree. `name` must be
    /// a single word not starting with `-`.
    pub fn add_subcommand<S: 'static, P: 'static>(
        &mut self,
        parent: CommandHandle<P>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<CommandHandle<S>, ConfigError> {
        let parent = self.expect_node(parent);
        let name = name.into();
        if self.commands.iter().any(|c| c.scope == TypeId::of::<S>()) {
            return Err(ConfigError::DuplicateScope(type_name::<S>()));
        }
        check_subcommand_name(&name)?;
        let parent_node = &self.commands[parent];
        if parent_node.children.iter().any(|&c| self.commands[c].name() == name) {
            let parent = parent_node.display_path();
            return Err(ConfigError::DuplicateSubcommand { parent, name });
        }

        let mut path = parent_node.path.clone();
        path.push(name);
        let mut node = CommandNode::new(path, TypeId::of::<S>());
        node.description = Some(description.into()).filter(|d: &String| !d.is_empty());
        let scope = type_name::<S>();
        tracing::trace!(path = %node.display_path(), scope, "register subcommand");
        let index = self.commands.len();
        self.commands.push(node);
        self.commands[parent].children.push(index);
        Ok(CommandHandle { index, _scope: PhantomData })
    }

    /// Declare options and constraints of `cmd`.
    ///
    /// # Panics
    ///
    /// If `cmd` was created by another [`Cli`].
    #[track_caller]
    pub fn command<S: 'static>(&mut self, cmd: CommandHandle<S>) -> CommandMut<'_, S> {
        let index = self.expect_node(cmd);
        CommandMut { node: &mut self.commands[index], ids: &mut self.ids, _scope: PhantomData }
    }

    /// Parse `argv`, whose first item is the program name.
    ///
    /// Values bound by a previous run are discarded first. On success, every
    /// command on the path selected by `argv` has its [`Results`].
    pub fn run<I, T>(&mut self, argv: I) -> crate::Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        for node in &mut self.commands {
            node.registry.reset();
            node.succeeded = false;
        }

        let mut argv = argv.into_iter().map(Into::into);
        let Some(program) = argv.next() else {
            let root = self.commands[0].display_path();
            return Err(ParseError::new(root, vec!["missing program name".into()]).into());
        };
        let tokens = tokenize(argv);
        tracing::debug!(
            program = %program.to_string_lossy(),
            tokens = tokens.len(),
            "tokenized"
        );

        let mut current = 0;
        let mut rest = &tokens[..];
        loop {
            let node = &self.commands[current];
            let subcommands =
                node.children.iter().map(|&c| self.commands[c].name()).collect::<Vec<_>>();
            let mut ast = ast::build(rest, &node.registry, &subcommands);

            let node = &mut self.commands[current];
            let mut errors = std::mem::take(&mut ast.errors);
            errors.extend(analyze(&ast, &mut node.registry)?);
            if errors.is_empty() {
                errors = node.constraints.check(&node.registry);
            }
            if !errors.is_empty() {
                let command = node.display_path();
                tracing::debug!(%command, errors = errors.len(), "parse failed");
                return Err(ParseError::new(command, errors).into());
            }
            node.succeeded = true;

            let Some((child, start)) = ast.subcommand else { return Ok(()) };
            current = node.children[child];
            rest = &rest[start..];
            tracing::debug!(command = %self.commands[current].display_path(), "dispatch");
        }
    }

    /// The results of `cmd`, if the last [`run`](Self::run) parsed it successfully.
    #[must_use]
    pub fn try_get_results<S: 'static>(&self, cmd: CommandHandle<S>) -> Option<&Results<S>> {
        let node = &self.commands[self.node_index(cmd)?];
        node.succeeded.then(|| Results::new(&node.registry))
    }

    /// Describe `cmd` for help rendering.
    ///
    /// # Panics
    ///
    /// If `cmd` was created by another [`Cli`].
    #[must_use]
    #[track_caller]
    pub fn info<S: 'static>(&self, cmd: CommandHandle<S>) -> CommandInfo<'_> {
        let node = &self.commands[self.expect_node(cmd)];
        CommandInfo {
            path: node.path.iter().map(String::as_str).collect(),
            description: node.description.as_deref(),
            registry: &node.registry,
            subcommands: node
                .children
                .iter()
                .map(|&c| (self.commands[c].name(), self.commands[c].description.as_deref()))
                .collect(),
        }
    }

    /// Render the help text of `cmd`.
    #[cfg(feature = "help")]
    #[must_use]
    #[track_caller]
    pub fn render_help<S: 'static>(&self, cmd: CommandHandle<S>) -> String {
        let mut out = String::new();
        crate::help::render_help_into(&mut out, &self.info(cmd));
        out
    }
}

/// Registration surface of the command tagged `S`, from [`Cli::command`].
pub struct CommandMut<'a, S> {
    node: &'a mut CommandNode,
    ids: &'a mut IdAllocator,
    _scope: PhantomData<fn() -> S>,
}

impl<S> fmt::Debug for CommandMut<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandMut")
            .field("path", &self.node.display_path())
            .finish_non_exhaustive()
    }
}

impl<S> CommandMut<'_, S> {
    fn add<O: OptionKind + Slot>(&mut self, option: O) -> Result<Handle<S, O>, ConfigError> {
        let id = self.node.registry.add(self.ids, option)?;
        Ok(Handle::new(id))
    }

    pub fn add_flag<T: 'static>(
        &mut self,
        flag: Flag<T>,
    ) -> Result<Handle<S, Flag<T>>, ConfigError> {
        self.add(flag)
    }

    pub fn add_multi_flag<T: 'static>(
        &mut self,
        flag: MultiFlag<T>,
    ) -> Result<Handle<S, MultiFlag<T>>, ConfigError> {
        self.add(flag)
    }

    pub fn add_positional<T: 'static>(
        &mut self,
        positional: Positional<T>,
    ) -> Result<Handle<S, Positional<T>>, ConfigError> {
        self.add(positional)
    }

    /// Register the argument collecting positionals beyond the declared ones.
    /// At most one per command.
    pub fn add_multi_positional<T: 'static>(
        &mut self,
        positional: MultiPositional<T>,
    ) -> Result<Handle<S, MultiPositional<T>>, ConfigError> {
        self.add(positional)
    }

    pub fn add_choice<T: Clone + 'static>(
        &mut self,
        choice: Choice<T>,
    ) -> Result<Handle<S, Choice<T>>, ConfigError> {
        self.add(choice)
    }

    pub fn add_multi_choice<T: Clone + 'static>(
        &mut self,
        choice: MultiChoice<T>,
    ) -> Result<Handle<S, MultiChoice<T>>, ConfigError> {
        self.add(choice)
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.node.description = Some(description.into());
        self
    }

    /// Fail the parse with `message` unless `condition` holds.
    pub fn require(&mut self, condition: Condition<S>, message: impl Into<String>) -> &mut Self {
        self.node.constraints.require(condition.into_expr(), message.into());
        self
    }

    /// Start a group of requirements that only apply when `precondition` holds.
    /// Their failures are reported prefixed with `label`.
    pub fn when(&mut self, precondition: Condition<S>, label: impl Into<String>) -> When<'_, S> {
        When::new(self.node.constraints.when(precondition.into_expr(), label.into()))
    }
}
