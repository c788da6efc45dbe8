#![no_main]

use core::fmt;

use itertools::Itertools;
use libfuzzer_sys::{arbitrary::Arbitrary, fuzz_target};

// Builtins and load from variables
#[derive(Arbitrary, Debug)]
enum LispyAtom {
    Add, Sub, Mul, Div,
    List, Head, Tail,
    Eval, Join,
    Def, Put, Lambda,
    Rest,

    Identifier(u8),
    Number(i64),
}

impl fmt::Display for LispyAtom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", match self {
            LispyAtom::Add => "+",
            LispyAtom::Sub => "-",
            LispyAtom::Mul => "*",
            LispyAtom::Div => "/",
            LispyAtom::List => "list",
            LispyAtom::Head => "head",
            LispyAtom::Tail => "tail",
            LispyAtom::Eval => "eval",
            LispyAtom::Join => "join",
            LispyAtom::Def => "def",
            LispyAtom::Put => "=",
            LispyAtom::Lambda => "\\",
            LispyAtom::Rest => "&",
            // A small alphabet so definitions and lookups collide
            LispyAtom::Identifier(id) => return write!(f, "v{}", id % 8),
            LispyAtom::Number(value) => return write!(f, "{}", value),
        })
    }
}

#[derive(Arbitrary, Debug)]
enum LispyCommand {
    SExpr(Vec<LispyCommand>),
    QExpr(Vec<LispyCommand>),

    Atom(LispyAtom),
}

fn stringify_arguments(values: &[LispyCommand]) -> String {
    values.iter()
        .map(LispyCommand::to_string)
        .join(" ")
}

impl fmt::Display for LispyCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LispyCommand::SExpr(args) => write!(f, "({})", stringify_arguments(args)),
            LispyCommand::QExpr(args) => write!(f, "{{{}}}", stringify_arguments(args)),
            LispyCommand::Atom(atom) => fmt::Display::fmt(atom, f),
        }
    }
}

fuzz_target!(|commands: Vec<LispyCommand>| {
    {
        let mut context = lispy::EvaluationContext::new();

        for command in commands {
            let command = command.to_string();
            let _ = context.evaluate_str(&command);
        }
    }
});
