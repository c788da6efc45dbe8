use lispy::EvaluationContext;

fn main() -> anyhow::Result<()> {
    let program = vec![
        "def {fun} (\\ {args body} {def (head args) (\\ (tail args) body)})",
        "fun {spam x} {* x eggs}",
        "spam 3",
        "def {eggs} 20",
        "spam 3",
        "fun {pack f & xs} {f xs}",
        "pack tail 1 2 3",
    ];

    let mut context = EvaluationContext::new();
    for source in program {
        match context.evaluate_str(source) {
            Ok(value) => println!("{}: {}", source, value),
            Err(err) => println!("{}: {}", source, err)
        }
    }

    Ok(())
}
