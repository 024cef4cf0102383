//! Memoizes the callbacks created inside JSX render functions.
//!
//! Every `.bind()` call and inline arrow closure inside a render function is
//! replaced by a call to a binder that caches bound functions by their
//! arguments, so repeated renders hand out identical callbacks:
//!
//! ```text
//! render() { return <div onClick={this.f.bind(this, 1)} />; }
//! ```
//!
//! becomes
//!
//! ```text
//! const _memoize = require("lru-memoize");
//! const _bindRenderFunc = _memoize(500)((func, context, ...args) => func.bind(context, ...args));
//! ...
//! render() { return <div onClick={_bindRenderFunc(this.f, this, 1)} />; }
//! ```

mod ast_builders;
mod cfg;
mod context;
mod detector;
mod error;
mod free_vars;
mod hoister;
mod injector;
mod memoizer;
mod report;
mod rewriter;
mod symbols;

pub use cfg::{
    BindMemoizerConfig, BindMemoizerJSONConfig, ImportStyle, DEFAULT_CACHE_SIZE,
    DEFAULT_MEMOIZE_MODULE,
};
pub use detector::{find_render_functions, RenderFunction, RenderFunctionKind};
pub use error::ConfigError;
pub use free_vars::captured_variables;
pub use memoizer::memoize_render_binds;
pub use report::MemoizeReport;
