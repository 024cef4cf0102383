use swc_common::comments::Comments;
use swc_common::sync::Lrc;
use swc_common::{FileName, Globals, Mark, SourceFile, SourceMap, GLOBALS};
use swc_ecma_ast::Program;
use swc_ecma_parser::{lexer::Lexer, Capturing, Parser, StringInput, Syntax};
use swc_ecma_parser::{EsSyntax, TsSyntax};
use swc_ecma_transforms::resolver;
use swc_ecma_visit::VisitMutWith;

#[derive(thiserror::Error, Debug)]
#[error("failed to parse {filename}: {message}")]
pub struct ParseError {
    pub filename: String,
    pub message: String,
}

impl ParseError {
    fn from_swc(filename: &str, err: swc_ecma_parser::error::Error) -> Self {
        Self {
            filename: filename.to_string(),
            message: err.kind().msg().to_string(),
        }
    }
}

pub fn is_typescript_filename(filename: &str) -> bool {
    [".ts", ".tsx", ".mts", ".cts"]
        .iter()
        .any(|ext| filename.ends_with(ext))
}

/// Picks the parser syntax from the file extension.
///
/// Anything that is not TypeScript is parsed as JavaScript with JSX enabled,
/// since plain `.js` files commonly carry JSX in React codebases.
pub fn syntax_for_filename(filename: &str) -> Syntax {
    if is_typescript_filename(filename) {
        Syntax::Typescript(TsSyntax {
            tsx: filename.ends_with(".tsx"),
            decorators: true,
            ..Default::default()
        })
    } else {
        Syntax::Es(EsSyntax {
            jsx: true,
            decorators: true,
            ..Default::default()
        })
    }
}

pub fn create_lexer<'a>(fm: &'a SourceFile, comments: Option<&'a dyn Comments>) -> Lexer<'a> {
    let filename = fm.name.to_string();
    Lexer::new(
        syntax_for_filename(&filename),
        Default::default(),
        StringInput::from(fm),
        comments,
    )
}

pub fn create_parser<'a>(
    fm: &'a Lrc<SourceFile>,
    comments: Option<&'a dyn Comments>,
) -> Parser<Capturing<Lexer<'a>>> {
    let lexer = create_lexer(fm, comments);
    let capturing = Capturing::new(lexer);

    Parser::new_from(capturing)
}

pub fn try_parse_ecma_src_comments<TName, TBody>(
    name_str: TName,
    body: TBody,
    comments: Option<&dyn Comments>,
) -> Result<(Lrc<SourceMap>, Program), ParseError>
where
    TName: Into<String>,
    TBody: ToString,
{
    let name: String = name_str.into();
    let cm = Lrc::<SourceMap>::default();
    let fm = cm.new_source_file(Lrc::new(FileName::Custom(name.clone())), body.to_string());

    let mut parser = create_parser(&fm, comments);
    let program = parser
        .parse_program()
        .map_err(|err| ParseError::from_swc(&name, err))?;
    // the parser recovers from some errors, but we refuse to transform those files
    if let Some(err) = parser.take_errors().into_iter().next() {
        return Err(ParseError::from_swc(&name, err));
    }

    Ok((cm, program))
}

/// Parses a source string, panicking on syntax errors.
///
/// Intended for tests and fixtures, where the source is known to be valid.
pub fn parse_ecma_src<TName, TBody>(name_str: TName, body: TBody) -> (Lrc<SourceMap>, Program)
where
    TName: Into<String>,
    TBody: ToString,
{
    match try_parse_ecma_src_comments(name_str, body, None) {
        Ok(parsed) => parsed,
        Err(err) => panic!("{}", err),
    }
}

/// Marks produced while resolving a program.
#[derive(Debug, Clone, Copy)]
pub struct ResolverMarks {
    pub unresolved_mark: Mark,
    pub top_level_mark: Mark,
}

/// Tags every identifier in `program` with the syntax context of its
/// declaring scope.
///
/// Must run inside `GLOBALS.set(..)`, see [`with_globals`].
pub fn resolve_program(program: &mut Program, typescript: bool) -> ResolverMarks {
    let marks = ResolverMarks {
        unresolved_mark: Mark::new(),
        top_level_mark: Mark::new(),
    };
    program.visit_mut_with(&mut resolver(
        marks.unresolved_mark,
        marks.top_level_mark,
        typescript,
    ));
    marks
}

/// Runs `op` with a fresh set of SWC globals.
///
/// Each module gets its own `Globals`, so marks never leak between files
/// processed on different threads.
pub fn with_globals<R>(op: impl FnOnce() -> R) -> R {
    GLOBALS.set(&Globals::new(), op)
}

/// Parses and resolves a source string in one step, panicking on syntax errors.
///
/// Must run inside `GLOBALS.set(..)`.
pub fn parse_and_resolve<TName, TBody>(name_str: TName, body: TBody) -> (Lrc<SourceMap>, Program)
where
    TName: Into<String>,
    TBody: ToString,
{
    let name: String = name_str.into();
    let typescript = is_typescript_filename(&name);
    let (cm, mut program) = parse_ecma_src(name, body);
    resolve_program(&mut program, typescript);
    (cm, program)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use swc_ecma_ast::{Decl, Program, Stmt};
    use swc_ecma_parser::Syntax;

    use super::{parse_and_resolve, syntax_for_filename, try_parse_ecma_src_comments, with_globals};

    #[test]
    fn test_syntax_for_filename() {
        assert!(matches!(syntax_for_filename("a.jsx"), Syntax::Es(es) if es.jsx));
        assert!(matches!(syntax_for_filename("a.js"), Syntax::Es(es) if es.jsx));
        assert!(matches!(syntax_for_filename("a.tsx"), Syntax::Typescript(ts) if ts.tsx));
        assert!(matches!(syntax_for_filename("a.ts"), Syntax::Typescript(ts) if !ts.tsx));
    }

    #[test]
    fn test_parses_jsx_module() {
        let (_cm, program) = try_parse_ecma_src_comments(
            "test.jsx",
            "import React from 'react';\nexport const App = () => <div />;",
            None,
        )
        .unwrap();
        match program {
            Program::Module(module) => assert_eq!(module.body.len(), 2),
            Program::Script(_) => panic!("expected a module"),
        }
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let Err(err) = try_parse_ecma_src_comments("broken.jsx", "const = ;", None) else {
            panic!("expected a parse error");
        };
        assert_eq!(err.filename, "broken.jsx");
        assert!(err.to_string().starts_with("failed to parse broken.jsx: "));
    }

    #[test]
    fn test_resolver_separates_shadowed_names() {
        with_globals(|| {
            let (_cm, program) = parse_and_resolve(
                "test.js",
                "let x = 1; function f() { let x = 2; }",
            );
            let Program::Script(script) = program else {
                panic!("expected a script");
            };
            let outer = match &script.body[0] {
                Stmt::Decl(Decl::Var(var)) => var.decls[0].name.as_ident().unwrap().id.ctxt,
                _ => panic!("expected a var decl"),
            };
            let inner = match &script.body[1] {
                Stmt::Decl(Decl::Fn(f)) => match &f.function.body.as_ref().unwrap().stmts[0] {
                    Stmt::Decl(Decl::Var(var)) => var.decls[0].name.as_ident().unwrap().id.ctxt,
                    _ => panic!("expected a var decl"),
                },
                _ => panic!("expected a fn decl"),
            };
            assert_ne!(outer, inner);
        });
    }
}
