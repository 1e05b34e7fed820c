// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! The command tree produced by the [parser](crate::parser), matching the
//! data model in `spec.md` §3 field for field.

use crate::source::Location;

/// A word as it appeared in the source: quoting and escaping are preserved
/// verbatim. `posh-expand` is what interprets this text; nothing in this
/// crate looks inside it beyond recognizing an assignment-word's `NAME=`
/// prefix (see [`SimpleCommand`]).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Word {
    pub text: String,
    pub location: Location,
}

impl Word {
    pub fn new(text: impl Into<String>, location: Location) -> Self {
        Word { text: text.into(), location }
    }
}

/// One of the nine redirectable operators named in `spec.md` §3.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RedirKind {
    InputRead,
    OutputTrunc,
    OutputClobber,
    Append,
    DupFd,
    ReadWrite,
    HereDoc,
    HereDocQuoted,
}

/// `{ fd, kind, operand }` as specified in `spec.md` §3. For `DupFd`,
/// `operand` is a decimal fd or `"-"`; for here-documents it is the
/// already-captured body.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Redirection {
    pub fd: u32,
    pub kind: RedirKind,
    pub operand: Word,
    pub location: Location,
    /// Set for `HereDoc`/`HereDocQuoted` redirections while parsing is in
    /// progress; the parser backpatches `operand` with the captured body
    /// (see `crate::parser`'s heredoc patching pass) and this becomes
    /// irrelevant once parsing a complete command finishes.
    pub heredoc_id: Option<u64>,
}

/// A `NAME=value` prefix to a simple command.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Assignment {
    pub name: String,
    pub value: Word,
    pub location: Location,
}

/// Ordered lists of assignment-words, plain words, and redirections, as
/// specified in `spec.md` §3. The three lists are kept separate here (with
/// each `Redirection` tagging the index in `words` it syntactically
/// followed is not tracked, since `spec.md` only requires left-to-right
/// *application* order, which `redirections`'s own order already gives).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SimpleCommand {
    pub assignments: Vec<Assignment>,
    pub words: Vec<Word>,
    pub redirections: Vec<Redirection>,
}

impl SimpleCommand {
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty() && self.words.is_empty() && self.redirections.is_empty()
    }
}

/// One `pattern,...) body ;;`/`;&` item of a `case` command.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CaseItem {
    pub patterns: Vec<Word>,
    pub body: Option<List>,
    /// True for a `;&`-terminated item (falls through into the next item
    /// unconditionally). `spec.md` calls this the "fall-through marker".
    pub fallthrough: bool,
}

/// One `condition; then body` pair of an `if` command.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ElifThen {
    pub condition: List,
    pub body: List,
}

/// The tagged variant over compound-command shapes from `spec.md` §3.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CommandKind {
    Simple(SimpleCommand),
    BraceGroup(List),
    Subshell(List),
    For { name: String, words: Option<Vec<Word>>, body: List },
    If { arms: Vec<ElifThen>, else_body: Option<List> },
    While { condition: List, body: List },
    Until { condition: List, body: List },
    Case { word: Word, items: Vec<CaseItem> },
    FunctionDef { name: String, body: Box<Command> },
}

/// A command together with its own redirections, which for compound
/// commands wrap the whole construct (`spec.md` §3).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Command {
    pub kind: CommandKind,
    pub redirections: Vec<Redirection>,
    pub location: Location,
}

/// `{ negated, commands }` (`spec.md` §3). A single-command pipeline runs
/// inline; `commands.len() > 1` forces a fork per command.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pipeline {
    pub negated: bool,
    pub commands: Vec<Command>,
}

/// The separator linking two pipelines in a [`List`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Sep {
    Semi,
    And,
    Or,
}

/// `{ pipelines, separators }` with `separators[i]` linking `pipelines[i]`
/// to `pipelines[i+1]`, the last entry always `Semi` (`spec.md` §3's
/// invariant: "A `List` has exactly one separator per pipeline").
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct List {
    pub pipelines: Vec<Pipeline>,
    pub separators: Vec<Sep>,
}

impl List {
    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }
}

/// A fully parsed top-level command. `spec.md` §3 calls for a pointer back
/// to "the previously executing `CompleteCommand`"; that bookkeeping is an
/// executor-side concern (trap re-entrancy), not a syntax-tree field, so it
/// lives in `posh-semantics` instead of here (see DESIGN.md).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CompleteCommand {
    pub list: List,
}
