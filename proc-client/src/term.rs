use std::fmt;

/// A scalar literal payload. The wire codec round-trips each case exactly,
/// so typed `--arg` values survive transmission without coercion.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => write!(f, "{}", s),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

/// One node of the symbolic tree submitted to the remote service.
///
/// The protocol is closed and stable: exactly these four shapes exist, and
/// the service evaluates a `Block` in order, returning the value of the
/// construct that encapsulates it.
#[derive(Clone, Debug, PartialEq)]
pub enum Term {
    Literal(Scalar),
    Binding { name: String, value: Box<Term> },
    Call { function: String, arguments: Vec<Term> },
    Block(Vec<Term>),
}

impl Term {
    pub fn literal(value: impl Into<Scalar>) -> Term {
        Term::Literal(value.into())
    }

    pub fn binding(name: impl Into<String>, value: Term) -> Term {
        Term::Binding {
            name: name.into(),
            value: Box::new(value),
        }
    }

    pub fn call(function: impl Into<String>, arguments: Vec<Term>) -> Term {
        Term::Call {
            function: function.into(),
            arguments,
        }
    }

    pub fn block(body: Vec<Term>) -> Term {
        Term::Block(body)
    }
}

/// The top-level ordered sequence of bindings forming one request payload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program(pub Vec<Term>);

/// The remote operation to build a program for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Operation {
    Compile,
    Run,
    Deploy { release: bool },
}

impl Operation {
    /// Path under the service base URL this operation posts to.
    pub fn path(&self) -> &'static str {
        match self {
            Operation::Compile => "core/compile",
            Operation::Run | Operation::Deploy { .. } => "core/exec",
        }
    }
}

/// Builds the program for `operation` over the given source text.
///
/// Total over its inputs: `source` and `lang` are opaque, and an
/// unrecognized language tag is passed through verbatim for the service to
/// reject. `args` appends one top-level binding per entry, in order, after
/// the primary binding; duplicate keys resolve last-wins.
pub fn build_program(
    source: &str,
    lang: &str,
    operation: Operation,
    args: &[(String, Scalar)],
) -> Program {
    let compile_bindings = vec![
        Term::binding("code", Term::literal(source)),
        Term::binding("lang", Term::literal(lang)),
    ];

    let mut terms = match operation {
        Operation::Compile => compile_bindings,
        Operation::Run => vec![Term::binding(
            "proc",
            Term::block(vec![
                Term::call("core.compile", compile_bindings),
                Term::call("core.exec", vec![]),
            ]),
        )],
        Operation::Deploy { release } => vec![Term::binding(
            "proc",
            Term::block(vec![
                Term::call("core.compile", compile_bindings),
                Term::call(
                    "core.deploy",
                    vec![Term::binding("release", Term::Literal(Scalar::Bool(release)))],
                ),
            ]),
        )],
    };

    for (key, value) in dedup_last_wins(args) {
        terms.push(Term::binding(key, Term::Literal(value)));
    }

    Program(terms)
}

fn dedup_last_wins(args: &[(String, Scalar)]) -> Vec<(String, Scalar)> {
    let mut out: Vec<(String, Scalar)> = Vec::with_capacity(args.len());
    for (key, value) in args {
        if let Some(existing) = out.iter_mut().find(|(k, _)| k == key) {
            existing.1 = value.clone();
        } else {
            out.push((key.clone(), value.clone()));
        }
    }
    out
}
