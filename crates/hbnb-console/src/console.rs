use serde_json::{Map, Value};
use tracing::{debug, error};

use hbnb_store::ObjectStore;
use hbnb_types::{Entity, EntityKind};

use crate::command::{normalize, unquote, Command, Verb};
use crate::error::ConsoleError;

/// Whether the read-eval loop keeps going after a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
}

/// Output lines of one command plus what the loop should do next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub lines: Vec<String>,
    pub control: Control,
}

impl Outcome {
    fn lines(lines: Vec<String>) -> Self {
        Self {
            lines,
            control: Control::Continue,
        }
    }

    fn silent() -> Self {
        Self::lines(Vec::new())
    }

    fn exit(lines: Vec<String>) -> Self {
        Self {
            lines,
            control: Control::Exit,
        }
    }
}

type VerbResult = Result<Vec<String>, ConsoleError>;

/// Command dispatcher over an injected store.
///
/// Each mutating verb saves the whole store once it succeeds. Validation
/// stops at the first failing check and reports exactly one line.
pub struct Console<S: ObjectStore> {
    store: S,
}

impl<S: ObjectStore> Console<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Normalize and run one input line.
    pub fn execute(&mut self, line: &str) -> Outcome {
        self.dispatch(normalize(line))
    }

    pub fn dispatch(&mut self, command: Command) -> Outcome {
        match command {
            Command::Empty => Outcome::silent(),
            Command::Quit => Outcome::exit(Vec::new()),
            Command::Eof => Outcome::exit(vec![String::new()]),
            Command::Help(topic) => Outcome::lines(help(topic.as_deref())),
            Command::Unknown(line) => Outcome::lines(vec![format!("*** Unknown syntax: {line}")]),
            Command::Verb { verb, args } => report(self.run_verb(verb, &args)),
            Command::UpdateDict {
                class,
                id,
                attributes,
            } => report(self.update_dict(&class, &id, &attributes)),
        }
    }

    fn run_verb(&mut self, verb: Verb, args: &str) -> VerbResult {
        match verb {
            Verb::Create => self.create(args),
            Verb::Show => self.show(args),
            Verb::Destroy => self.destroy(args),
            Verb::All => self.all(args),
            Verb::Count => self.count(args),
            Verb::Update => self.update(args),
        }
    }

    fn create(&mut self, args: &str) -> VerbResult {
        let kind = resolve_class(args.split_whitespace().next())?;
        if !kind.is_instantiable() {
            return Err(ConsoleError::ClassNameUnknown);
        }
        let entity = Entity::new(kind);
        let id = entity.id().to_string();
        self.store.insert(entity);
        self.persist()?;
        debug!(%kind, %id, "created");
        Ok(vec![id])
    }

    fn show(&self, args: &str) -> VerbResult {
        let mut tokens = args.split_whitespace();
        let kind = resolve_class(tokens.next())?;
        let id = tokens.next().ok_or(ConsoleError::InstanceIdMissing)?;
        let entity = self
            .store
            .get(kind, id)
            .ok_or(ConsoleError::InstanceNotFound)?;
        Ok(vec![entity.to_string()])
    }

    fn destroy(&mut self, args: &str) -> VerbResult {
        let mut tokens = args.split_whitespace();
        let kind = resolve_class(tokens.next())?;
        let id = tokens.next().ok_or(ConsoleError::InstanceIdMissing)?;
        if !self.store.delete(kind, id) {
            return Err(ConsoleError::InstanceNotFound);
        }
        self.persist()?;
        debug!(%kind, %id, "destroyed");
        Ok(Vec::new())
    }

    fn all(&self, args: &str) -> VerbResult {
        let filter = optional_class(args)?;
        Ok(self
            .store
            .all(filter)
            .into_iter()
            .map(ToString::to_string)
            .collect())
    }

    fn count(&self, args: &str) -> VerbResult {
        let filter = optional_class(args)?;
        Ok(vec![self.store.count(filter).to_string()])
    }

    /// `update <class> <id> <attribute> "<value>"`
    fn update(&mut self, args: &str) -> VerbResult {
        let fields = split_fields(args, 4);
        let kind = resolve_class(fields.first().copied())?;
        let id = *fields.get(1).ok_or(ConsoleError::InstanceIdMissing)?;
        if self.store.get(kind, id).is_none() {
            return Err(ConsoleError::InstanceNotFound);
        }
        let attribute = unquote(fields.get(2).ok_or(ConsoleError::AttributeNameMissing)?);
        let raw_value = *fields.get(3).ok_or(ConsoleError::AttributeValueMissing)?;
        if Entity::is_reserved(attribute) {
            return Err(ConsoleError::ReservedAttribute(attribute.to_string()));
        }
        let Some(value) = quoted_literal(raw_value) else {
            debug!(%kind, %id, %attribute, value = raw_value, "ignoring malformed update value");
            return Ok(Vec::new());
        };

        self.set_attributes(kind, id, [(attribute, Value::String(value.to_string()))])?;
        self.persist()?;
        Ok(Vec::new())
    }

    /// Apply every pair of a mapping literal, then save once.
    fn update_dict(&mut self, class: &str, id: &str, attributes: &Map<String, Value>) -> VerbResult {
        let kind = resolve_class(Some(class).filter(|c| !c.is_empty()))?;
        if id.is_empty() {
            return Err(ConsoleError::InstanceIdMissing);
        }
        if self.store.get(kind, id).is_none() {
            return Err(ConsoleError::InstanceNotFound);
        }
        if let Some(reserved) = attributes.keys().find(|name| Entity::is_reserved(name)) {
            return Err(ConsoleError::ReservedAttribute(reserved.clone()));
        }
        if attributes.is_empty() {
            return Ok(Vec::new());
        }

        self.set_attributes(
            kind,
            id,
            attributes.iter().map(|(name, value)| (name.as_str(), value.clone())),
        )?;
        self.persist()?;
        Ok(Vec::new())
    }

    fn set_attributes<'a>(
        &mut self,
        kind: EntityKind,
        id: &str,
        pairs: impl IntoIterator<Item = (&'a str, Value)>,
    ) -> Result<(), ConsoleError> {
        let entity = self
            .store
            .get_mut(kind, id)
            .ok_or(ConsoleError::InstanceNotFound)?;
        for (name, value) in pairs {
            entity
                .set_attribute(name, value)
                .map_err(|_| ConsoleError::ReservedAttribute(name.to_string()))?;
        }
        debug!(%kind, %id, "updated");
        Ok(())
    }

    fn persist(&self) -> Result<(), ConsoleError> {
        self.store.save().map_err(|e| {
            error!(error = %e, "failed to save object store");
            ConsoleError::from(e)
        })
    }
}

fn report(result: VerbResult) -> Outcome {
    match result {
        Ok(lines) => Outcome::lines(lines),
        Err(e) => Outcome::lines(vec![e.to_string()]),
    }
}

fn resolve_class(name: Option<&str>) -> Result<EntityKind, ConsoleError> {
    name.ok_or(ConsoleError::ClassNameMissing)?
        .parse()
        .map_err(|_| ConsoleError::ClassNameUnknown)
}

fn optional_class(args: &str) -> Result<Option<EntityKind>, ConsoleError> {
    args.split_whitespace()
        .next()
        .map(|name| resolve_class(Some(name)))
        .transpose()
}

/// Split on whitespace into at most `n` fields; the last keeps its inner spacing.
fn split_fields(args: &str, n: usize) -> Vec<&str> {
    let mut fields = Vec::with_capacity(n);
    let mut rest = args.trim();
    while !rest.is_empty() {
        if fields.len() + 1 == n {
            fields.push(rest);
            break;
        }
        match rest.split_once(char::is_whitespace) {
            Some((field, tail)) => {
                fields.push(field);
                rest = tail.trim_start();
            }
            None => {
                fields.push(rest);
                break;
            }
        }
    }
    fields
}

/// The text inside a single `"..."` literal with nothing before or after it.
fn quoted_literal(raw: &str) -> Option<&str> {
    let parts: Vec<&str> = raw.split('"').collect();
    match parts.as_slice() {
        ["", inner, ""] => Some(*inner),
        _ => None,
    }
}

const HELP_TOPICS: [&str; 9] = [
    "EOF", "all", "count", "create", "destroy", "help", "quit", "show", "update",
];

fn help(topic: Option<&str>) -> Vec<String> {
    let Some(topic) = topic else {
        let header = "Documented commands (type help <topic>):";
        return vec![
            String::new(),
            header.to_string(),
            "=".repeat(header.len()),
            HELP_TOPICS.join("  "),
            String::new(),
        ];
    };
    let text = match topic {
        "quit" => "Quit command to exit the program",
        "EOF" => "Press ^D (Control + D) to exit the program",
        "help" => "List available commands with \"help\" or detailed help with \"help <command>\"",
        other => match Verb::parse(other) {
            Some(verb) => verb.usage(),
            None => return vec![format!("*** No help on {other}")],
        },
    };
    text.lines().map(str::to_string).collect()
}
