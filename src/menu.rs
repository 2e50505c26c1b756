//! # Menu Engine
//!
//! A menu is an ordered list of labelled actions. Each render pass:
//!
//! 1. keeps only the options whose visibility predicate holds for the context
//!    (an option without a predicate is always visible);
//! 2. terminates with a goodbye message if nothing is visible;
//! 3. prints the title and the visible options numbered from 1;
//! 4. reads a selection in `0..=count`, `0` cancelling the menu;
//! 5. dispatches the chosen action.
//!
//! ## Dispatch and cleanup
//!
//! Actions registered with [`Menu::add_option_with_cleanup`] receive a
//! [`Cleanups`] registrar. Whatever the action's outcome (success, error, or
//! [`Interrupted`]), every registered callback runs exactly once, in
//! registration order, before the menu continues. An interruption is caught
//! here and nowhere else: it is reported as `Aborting...` when cleanups are
//! pending and `Aborted!` otherwise. Any other action error is printed and
//! only aborts that action.

use crate::error::{Interrupted, SelectionError};
use crate::terminal::Terminal;
use log::{debug, warn};

/// What an action returns. Return `Err(Interrupted.into())` (or propagate it
/// with `?`) to abort.
pub type ActionResult = anyhow::Result<()>;

type PlainAction<C> = Box<dyn FnMut(&mut C, &mut dyn Terminal) -> ActionResult>;
type RegistrarAction<C> = Box<dyn FnMut(&mut C, &mut dyn Terminal, &mut Cleanups<C>) -> ActionResult>;
type Predicate<C> = Box<dyn Fn(&C) -> bool>;
type CleanupFn<C> = Box<dyn FnOnce(&mut C, &mut dyn Terminal)>;

/// The call signature of an action, fixed when it is registered.
enum Action<C> {
    Plain(PlainAction<C>),
    WithCleanup(RegistrarAction<C>),
}

pub struct MenuOption<C> {
    label: String,
    action: Action<C>,
    visible_when: Option<Predicate<C>>,
}

impl<C> MenuOption<C> {
    /// Only show this option while `predicate` holds.
    pub fn visible_when(&mut self, predicate: impl Fn(&C) -> bool + 'static) -> &mut Self {
        self.visible_when = Some(Box::new(predicate));
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    fn is_visible(&self, ctx: &C) -> bool {
        self.visible_when.as_ref().map_or(true, |predicate| predicate(ctx))
    }
}

/// Cleanup callbacks registered by one dispatched action.
pub struct Cleanups<C> {
    callbacks: Vec<CleanupFn<C>>,
}

impl<C> Cleanups<C> {
    fn new() -> Self {
        Self { callbacks: Vec::new() }
    }

    pub fn register(&mut self, cleanup: impl FnOnce(&mut C, &mut dyn Terminal) + 'static) {
        self.callbacks.push(Box::new(cleanup));
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    fn run(self, ctx: &mut C, term: &mut dyn Terminal) {
        if !self.callbacks.is_empty() {
            debug!("Running {} cleanup callbacks", self.callbacks.len());
        }
        for cleanup in self.callbacks {
            cleanup(&mut *ctx, &mut *term);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Return after one dispatch.
    Once,
    /// Render again after every dispatch until cancelled or nothing is visible.
    Loop,
}

/// How a dispatched action ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// Interrupted by the user.
    Aborted,
    /// Returned an error other than an interruption.
    Failed,
}

/// Why [`Menu::show`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuExit {
    /// No option was visible.
    Terminated,
    /// The user selected `0` or interrupted the selection prompt.
    Cancelled,
    /// [`Mode::Once`] only: an action ran.
    Dispatched(Outcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection {
    Cancel,
    Pick(usize),
}

pub struct Menu<C> {
    title: Option<String>,
    options: Vec<MenuOption<C>>,
}

impl<C: 'static> Default for Menu<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: 'static> Menu<C> {
    pub fn new() -> Self {
        Self {
            title: None,
            options: Vec::new(),
        }
    }

    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            options: Vec::new(),
        }
    }

    /// Register an action that takes no cleanup registrar.
    pub fn add_option(
        &mut self,
        label: impl Into<String>,
        action: impl FnMut(&mut C, &mut dyn Terminal) -> ActionResult + 'static,
    ) -> &mut MenuOption<C> {
        self.push(label.into(), Action::Plain(Box::new(action)))
    }

    /// Register an action that is handed a [`Cleanups`] registrar.
    pub fn add_option_with_cleanup(
        &mut self,
        label: impl Into<String>,
        action: impl FnMut(&mut C, &mut dyn Terminal, &mut Cleanups<C>) -> ActionResult + 'static,
    ) -> &mut MenuOption<C> {
        self.push(label.into(), Action::WithCleanup(Box::new(action)))
    }

    fn push(&mut self, label: String, action: Action<C>) -> &mut MenuOption<C> {
        self.options.push(MenuOption {
            label,
            action,
            visible_when: None,
        });
        let last = self.options.len() - 1;
        &mut self.options[last]
    }

    /// Labels of the options visible for `ctx`, in display order.
    pub fn visible_labels(&self, ctx: &C) -> Vec<&str> {
        self.visible(ctx)
            .into_iter()
            .map(|index| self.options[index].label())
            .collect()
    }

    fn visible(&self, ctx: &C) -> Vec<usize> {
        self.options
            .iter()
            .enumerate()
            .filter(|(_, option)| option.is_visible(ctx))
            .map(|(index, _)| index)
            .collect()
    }

    /// Run the menu until it terminates, is cancelled, or (in [`Mode::Once`])
    /// an action has been dispatched.
    pub fn show(&mut self, ctx: &mut C, term: &mut dyn Terminal, mode: Mode) -> MenuExit {
        loop {
            let visible = self.visible(ctx);
            if visible.is_empty() {
                term.print("No options available. Goodbye!");
                return MenuExit::Terminated;
            }

            if let Some(title) = &self.title {
                term.print(title);
            }
            for (ordinal, &index) in visible.iter().enumerate() {
                term.print(&format!("{}) {}", ordinal + 1, self.options[index].label));
            }

            let index = match read_selection(term, visible.len()) {
                Selection::Cancel => return MenuExit::Cancelled,
                Selection::Pick(ordinal) => visible[ordinal - 1],
            };

            term.print("");
            let outcome = self.dispatch(index, ctx, term);

            if mode == Mode::Once {
                return MenuExit::Dispatched(outcome);
            }
            term.print("");
        }
    }

    fn dispatch(&mut self, index: usize, ctx: &mut C, term: &mut dyn Terminal) -> Outcome {
        let option = &mut self.options[index];
        debug!("Dispatching menu option {:?}", option.label);

        let mut cleanups = Cleanups::new();
        let result = match &mut option.action {
            Action::Plain(action) => action(&mut *ctx, &mut *term),
            Action::WithCleanup(action) => action(&mut *ctx, &mut *term, &mut cleanups),
        };

        let outcome = match result {
            Ok(()) => Outcome::Completed,
            Err(err) if err.downcast_ref::<Interrupted>().is_some() => {
                let message = if cleanups.is_empty() { "Aborted!" } else { "Aborting..." };
                term.alert(&format!("\n{message}"));
                Outcome::Aborted
            }
            Err(err) => {
                warn!("Menu option {:?} failed: {err:#}", option.label);
                term.print(&format!("Error: {err:#}"));
                Outcome::Failed
            }
        };

        cleanups.run(ctx, term);
        outcome
    }
}

/// Validate a selection token against `count` visible options.
///
/// `0` is accepted and means cancel; `1..=count` select an option. Only plain
/// digits are a number: `+1` and `1.0` are not.
pub fn parse_selection(raw: &str, count: usize) -> Result<usize, SelectionError> {
    let raw = raw.trim();
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SelectionError::NotANumber);
    }
    if negative {
        return Err(SelectionError::Negative);
    }

    match digits.parse::<usize>() {
        Ok(n) if n <= count => Ok(n),
        // Too large for a usize is out of range as well.
        _ => Err(SelectionError::OutOfRange { max: count }),
    }
}

fn read_selection(term: &mut dyn Terminal, count: usize) -> Selection {
    loop {
        let raw = match term.read_line("Make a selection: ") {
            Ok(raw) => raw,
            Err(Interrupted) => {
                term.alert(" Selection cancelled!");
                return Selection::Cancel;
            }
        };

        match parse_selection(&raw, count) {
            Ok(0) => return Selection::Cancel,
            Ok(ordinal) => return Selection::Pick(ordinal),
            Err(err) => term.print(&err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::ScriptedTerminal;

    #[derive(Default)]
    struct Ctx {
        logged_in: bool,
        calls: Vec<&'static str>,
    }

    #[test]
    fn test_parse_selection_bounds() {
        for n in 0..=3 {
            assert_eq!(parse_selection(&n.to_string(), 3), Ok(n));
        }
        assert_eq!(parse_selection("-1", 3), Err(SelectionError::Negative));
        assert_eq!(parse_selection("4", 3), Err(SelectionError::OutOfRange { max: 3 }));
        assert_eq!(parse_selection("abc", 3), Err(SelectionError::NotANumber));
        assert_eq!(parse_selection("+1", 3), Err(SelectionError::NotANumber));
        assert_eq!(parse_selection("1.0", 3), Err(SelectionError::NotANumber));
        assert_eq!(parse_selection("-", 3), Err(SelectionError::NotANumber));
        assert_eq!(parse_selection("", 3), Err(SelectionError::NotANumber));
        assert_eq!(parse_selection(" 2 ", 3), Ok(2));
        assert_eq!(
            parse_selection("99999999999999999999999", 3),
            Err(SelectionError::OutOfRange { max: 3 })
        );
    }

    #[test]
    fn test_invalid_selections_reprompt() {
        let mut menu = Menu::<Ctx>::new();
        menu.add_option("Only", |ctx: &mut Ctx, _: &mut dyn Terminal| {
            ctx.calls.push("only");
            Ok(())
        });
        let mut ctx = Ctx::default();
        let mut term = ScriptedTerminal::new(["-1", "2", "abc", "", "1"]);

        let exit = menu.show(&mut ctx, &mut term, Mode::Once);

        assert_eq!(exit, MenuExit::Dispatched(Outcome::Completed));
        assert_eq!(ctx.calls, ["only"]);
        assert_eq!(term.prompts().len(), 5);
        assert!(term.printed("Select a positive number!"));
        assert!(term.printed("Selection out of bounds: must be at most 1"));
        assert!(term.printed("Your selection must be a number!"));
    }

    #[test]
    fn test_hidden_option_is_never_selectable() {
        let mut menu = Menu::<Ctx>::titled("Main");
        menu.add_option("Log in", |ctx: &mut Ctx, _: &mut dyn Terminal| {
            ctx.calls.push("log in");
            Ok(())
        })
        .visible_when(|ctx: &Ctx| !ctx.logged_in);
        menu.add_option("Log out", |ctx: &mut Ctx, _: &mut dyn Terminal| {
            ctx.calls.push("log out");
            Ok(())
        })
        .visible_when(|ctx: &Ctx| ctx.logged_in);
        menu.add_option("Help", |ctx: &mut Ctx, _: &mut dyn Terminal| {
            ctx.calls.push("help");
            Ok(())
        });

        let mut ctx = Ctx::default();
        assert_eq!(menu.visible_labels(&ctx), ["Log in", "Help"]);

        // Ordinal 3 would reach "Help" only if "Log out" were counted.
        let mut term = ScriptedTerminal::new(["3", "2"]);
        menu.show(&mut ctx, &mut term, Mode::Once);

        assert_eq!(ctx.calls, ["help"]);
        assert!(term.printed("1) Log in"));
        assert!(term.printed("2) Help"));
        assert!(!term.printed("Log out"));
    }

    #[test]
    fn test_zero_and_interrupt_cancel() {
        let mut menu = Menu::<Ctx>::new();
        menu.add_option("Thing", |ctx: &mut Ctx, _: &mut dyn Terminal| {
            ctx.calls.push("thing");
            Ok(())
        });
        let mut ctx = Ctx::default();

        let mut term = ScriptedTerminal::new(["0"]);
        assert_eq!(menu.show(&mut ctx, &mut term, Mode::Loop), MenuExit::Cancelled);
        assert!(!term.printed("cancelled"));

        let mut term = ScriptedTerminal::default();
        term.push_interrupt();
        assert_eq!(menu.show(&mut ctx, &mut term, Mode::Loop), MenuExit::Cancelled);
        assert!(term.printed("Selection cancelled!"));
        assert!(ctx.calls.is_empty());
    }

    #[test]
    fn test_no_visible_options_terminates() {
        let mut menu = Menu::<Ctx>::new();
        menu.add_option("Never", |_: &mut Ctx, _: &mut dyn Terminal| Ok(()))
            .visible_when(|_: &Ctx| false);
        let mut term = ScriptedTerminal::default();

        let exit = menu.show(&mut Ctx::default(), &mut term, Mode::Loop);

        assert_eq!(exit, MenuExit::Terminated);
        assert!(term.printed("No options available. Goodbye!"));
        assert!(term.prompts().is_empty());
    }

    #[test]
    fn test_cleanups_run_in_order_after_interrupt() {
        let mut menu = Menu::<Ctx>::new();
        menu.add_option_with_cleanup(
            "Work",
            |ctx: &mut Ctx, term: &mut dyn Terminal, cleanups: &mut Cleanups<Ctx>| {
                cleanups.register(|ctx: &mut Ctx, _: &mut dyn Terminal| ctx.calls.push("first"));
                cleanups.register(|ctx: &mut Ctx, _: &mut dyn Terminal| ctx.calls.push("second"));
                ctx.calls.push("body");
                term.read_line("Waiting: ")?;
                ctx.calls.push("unreachable");
                Ok(())
            },
        );
        let mut ctx = Ctx::default();
        let mut term = ScriptedTerminal::new(["1"]);
        term.push_interrupt();

        let exit = menu.show(&mut ctx, &mut term, Mode::Once);

        assert_eq!(exit, MenuExit::Dispatched(Outcome::Aborted));
        assert_eq!(ctx.calls, ["body", "first", "second"]);
        assert!(term.printed("Aborting..."));
    }

    #[test]
    fn test_interrupt_without_cleanups_reports_aborted() {
        let mut menu = Menu::<Ctx>::new();
        menu.add_option("Wait", |_: &mut Ctx, term: &mut dyn Terminal| {
            term.read_line("Press enter...")?;
            Ok(())
        });
        let mut term = ScriptedTerminal::new(["1"]);
        term.push_interrupt();

        let exit = menu.show(&mut Ctx::default(), &mut term, Mode::Once);

        assert_eq!(exit, MenuExit::Dispatched(Outcome::Aborted));
        assert!(term.printed("Aborted!"));
        assert!(!term.printed("Aborting..."));
    }

    #[test]
    fn test_failed_action_still_runs_cleanups_and_loop_continues() {
        let mut menu = Menu::<Ctx>::new();
        menu.add_option_with_cleanup(
            "Fail",
            |_: &mut Ctx, _: &mut dyn Terminal, cleanups: &mut Cleanups<Ctx>| {
                cleanups.register(|ctx: &mut Ctx, _: &mut dyn Terminal| ctx.calls.push("cleanup"));
                anyhow::bail!("catalogue is broken")
            },
        );
        let mut ctx = Ctx::default();
        let mut term = ScriptedTerminal::new(["1", "1", "0"]);

        let exit = menu.show(&mut ctx, &mut term, Mode::Loop);

        assert_eq!(exit, MenuExit::Cancelled);
        assert_eq!(ctx.calls, ["cleanup", "cleanup"]);
        assert!(term.printed("Error: catalogue is broken"));
    }

    #[test]
    fn test_loop_rerenders_with_fresh_visibility() {
        let mut menu = Menu::<Ctx>::titled("Main");
        menu.add_option("Log in", |ctx: &mut Ctx, _: &mut dyn Terminal| {
            ctx.logged_in = true;
            Ok(())
        })
        .visible_when(|ctx: &Ctx| !ctx.logged_in);
        menu.add_option("Log out", |ctx: &mut Ctx, _: &mut dyn Terminal| {
            ctx.logged_in = false;
            ctx.calls.push("log out");
            Ok(())
        })
        .visible_when(|ctx: &Ctx| ctx.logged_in);

        let mut ctx = Ctx::default();
        // Both options sit at ordinal 1 in their own render pass.
        let mut term = ScriptedTerminal::new(["1", "1", "0"]);

        assert_eq!(menu.show(&mut ctx, &mut term, Mode::Loop), MenuExit::Cancelled);
        assert_eq!(ctx.calls, ["log out"]);
        assert!(!ctx.logged_in);
    }
}
