/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! The mini-evaluator: walks the parsed AST of one BUILD file and produces
//! the target descriptors declared in it.
//!
//! Top-level assignments populate a per-file environment; top-level calls to
//! recognized rules are handed to the rule extractor; any other top-level
//! call that carries a `name` argument is remembered in `other_names` so a
//! label pointing at it can resolve to nothing instead of erroring.
//!
//! The environment lives only for the duration of one file. There is no
//! `load` evaluation and no cross-file symbol table.

use std::path::Path;

use anyhow::Context;
use bazelmake_core::target::Target;
use starlark::syntax::AstModule;
use starlark::syntax::Dialect;
use starlark_map::small_map::SmallMap;
use starlark_map::small_set::SmallSet;
use starlark_syntax::syntax::ast::ArgumentP;
use starlark_syntax::syntax::ast::AssignP;
use starlark_syntax::syntax::ast::AssignTargetP;
use starlark_syntax::syntax::ast::AstAssignTarget;
use starlark_syntax::syntax::ast::AstExpr;
use starlark_syntax::syntax::ast::AstLiteral;
use starlark_syntax::syntax::ast::AstNoPayload;
use starlark_syntax::syntax::ast::AstStmt;
use starlark_syntax::syntax::ast::BinOp;
use starlark_syntax::syntax::ast::CallArgsP;
use starlark_syntax::syntax::ast::Clause;
use starlark_syntax::syntax::ast::ClauseP;
use starlark_syntax::syntax::ast::ExprP;
use starlark_syntax::syntax::ast::ForClause;
use starlark_syntax::syntax::ast::StmtP;
use starlark_syntax::syntax::module::AstModuleFields;
use tracing::debug;

use crate::globspec;
use crate::rules;
use crate::rules::RuleKind;
use crate::values::StarValue;

/// Everything extracted from one BUILD file.
#[derive(Debug, Default)]
pub struct EvaluatedFile {
    /// Targets of recognized rules, in declaration order.
    pub targets: Vec<Target>,
    /// Names of top-level rules we do not model.
    pub other_names: SmallSet<String>,
}

/// Reads and evaluates the BUILD file at `path`.
pub fn evaluate_build_file(path: &Path) -> anyhow::Result<EvaluatedFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read BUILD file `{}`", path.display()))?;
    evaluate_build_source(path, content)
}

/// Evaluates BUILD file content. `path` names the file in diagnostics and
/// anchors `glob` expansion to its directory.
pub fn evaluate_build_source(path: &Path, content: String) -> anyhow::Result<EvaluatedFile> {
    let module = AstModule::parse(&path.to_string_lossy(), content, &Dialect::Extended)
        .map_err(|e| e.into_anyhow())
        .with_context(|| format!("failed to parse BUILD file `{}`", path.display()))?;

    let mut evaluator = BuildFileEvaluator {
        dir: path.parent().unwrap_or_else(|| Path::new("")),
        env: SmallMap::new(),
    };
    let mut out = EvaluatedFile::default();
    match &module.statement().node {
        StmtP::Statements(stmts) => {
            for stmt in stmts {
                evaluator.top_level_stmt(stmt, &mut out)?;
            }
        }
        _ => evaluator.top_level_stmt(module.statement(), &mut out)?,
    }
    Ok(out)
}

pub(crate) struct BuildFileEvaluator<'a> {
    dir: &'a Path,
    env: SmallMap<String, StarValue>,
}

impl BuildFileEvaluator<'_> {
    fn top_level_stmt(&mut self, stmt: &AstStmt, out: &mut EvaluatedFile) -> anyhow::Result<()> {
        match &stmt.node {
            StmtP::Assign(AssignP { lhs, ty: _, rhs }) => {
                let name = self.assign_target_name(lhs)?;
                let value = self.eval(rhs)?;
                self.env.insert(name, value);
            }
            StmtP::Expression(expr) => {
                if let ExprP::Call(callee, args) = &expr.node {
                    self.top_level_call(callee, args, out)?;
                }
            }
            // `load` declarations, `def`s and everything else at top level
            // carry no targets and are ignored.
            _ => {}
        }
        Ok(())
    }

    fn top_level_call(
        &mut self,
        callee: &AstExpr,
        args: &CallArgsP<AstNoPayload>,
        out: &mut EvaluatedFile,
    ) -> anyhow::Result<()> {
        match RuleKind::from_callee(expr_text(callee)) {
            Some(kind) => {
                let target = rules::extract(self, kind, args)?;
                out.targets.push(target);
            }
            None => {
                for arg in &args.args {
                    if let ArgumentP::Named(arg_name, value) = &arg.node {
                        if arg_name.node == "name" {
                            let name = expr_text(value);
                            if !name.is_empty() {
                                out.other_names.insert(name.to_owned());
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    pub(crate) fn eval(&mut self, expr: &AstExpr) -> anyhow::Result<StarValue> {
        Ok(match &expr.node {
            ExprP::Identifier(ident) => self
                .env
                .get(ident.node.ident.as_str())
                .cloned()
                .unwrap_or(StarValue::Absent),
            ExprP::Literal(AstLiteral::String(s)) => StarValue::Str(s.node.clone()),
            // Number tokens come through as their literal text.
            ExprP::Literal(AstLiteral::Int(i)) => StarValue::List(vec![i.node.to_string()]),
            ExprP::Literal(AstLiteral::Float(f)) => StarValue::List(vec![f.node.to_string()]),
            ExprP::Literal(AstLiteral::Ellipsis) => StarValue::Absent,
            ExprP::List(elems) => {
                let mut items = Vec::new();
                for elem in elems {
                    items.extend(self.eval(elem)?.into_strings());
                }
                StarValue::List(items)
            }
            ExprP::Op(lhs, BinOp::Add, rhs) => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                lhs.concat(rhs)
            }
            ExprP::Op(_, op, _) => {
                debug!("unsupported binary operator `{}`", op.to_string().trim());
                StarValue::List(Vec::new())
            }
            ExprP::Call(callee, args) => self.eval_call(callee, args)?,
            ExprP::Dict(_) => StarValue::Dict,
            ExprP::ListComprehension(body, first_for, clauses) => {
                self.eval_comprehension(body, first_for, clauses)?
            }
            _ => {
                debug!("unsupported expression shape, evaluating to empty");
                StarValue::List(Vec::new())
            }
        })
    }

    fn eval_call(
        &mut self,
        callee: &AstExpr,
        args: &CallArgsP<AstNoPayload>,
    ) -> anyhow::Result<StarValue> {
        match self.callee_name(callee)?.as_str() {
            "glob" => {
                let mut patterns = Vec::new();
                for arg in &args.args {
                    match &arg.node {
                        ArgumentP::Positional(value) => {
                            patterns.extend(self.eval(value)?.into_strings());
                        }
                        ArgumentP::Named(arg_name, _) => {
                            debug!("ignoring `{}` argument of glob()", arg_name.node);
                        }
                        ArgumentP::Args(_) | ArgumentP::KwArgs(_) => {}
                    }
                }
                Ok(StarValue::List(globspec::expand(self.dir, &patterns)?))
            }
            // Configuration resolution is out of scope; a select() contributes
            // nothing.
            "select" => Ok(StarValue::List(Vec::new())),
            name => {
                debug!("unsupported call to `{}`, evaluating to absent", name);
                Ok(StarValue::Absent)
            }
        }
    }

    /// The callee of a call expression, as a dotted name.
    fn callee_name(&mut self, callee: &AstExpr) -> anyhow::Result<String> {
        Ok(match &callee.node {
            ExprP::Identifier(ident) => ident.node.ident.clone(),
            ExprP::Dot(x, attr) => {
                let mut parts = self.eval(x)?.into_strings();
                parts.push(attr.node.clone());
                parts.join(".")
            }
            _ => String::new(),
        })
    }

    /// The name bound by an assignment target; dotted targets join their
    /// components with `.`.
    fn assign_target_name(&mut self, lhs: &AstAssignTarget) -> anyhow::Result<String> {
        Ok(match &lhs.node {
            AssignTargetP::Identifier(ident) => ident.node.ident.clone(),
            AssignTargetP::Dot(x, attr) => {
                let mut parts = self.eval(x)?.into_strings();
                parts.push(attr.node.clone());
                parts.join(".")
            }
            _ => String::new(),
        })
    }

    fn eval_comprehension(
        &mut self,
        body: &AstExpr,
        first_for: &ForClause,
        clauses: &[Clause],
    ) -> anyhow::Result<StarValue> {
        let mut items = Vec::new();
        self.eval_for_clause(first_for, body, &mut items)?;
        for clause in clauses {
            match clause {
                ClauseP::For(for_clause) => self.eval_for_clause(for_clause, body, &mut items)?,
                ClauseP::If(_) => debug!("unsupported `if` clause in comprehension"),
            }
        }
        Ok(StarValue::List(items))
    }

    /// One `for v in xs` clause: iterate the string-coerced elements, binding
    /// `v` in the file environment, and accumulate the body's results.
    fn eval_for_clause(
        &mut self,
        clause: &ForClause,
        body: &AstExpr,
        items: &mut Vec<String>,
    ) -> anyhow::Result<()> {
        let var = self.assign_target_name(&clause.var)?;
        for item in self.eval(&clause.over)?.into_strings() {
            self.env.insert(var.clone(), StarValue::Str(item));
            items.extend(self.eval(body)?.into_strings());
        }
        Ok(())
    }
}

/// Literal text of an expression: an identifier's name or a string literal's
/// value. Everything else is empty.
fn expr_text(expr: &AstExpr) -> &str {
    match &expr.node {
        ExprP::Identifier(ident) => &ident.node.ident,
        ExprP::Literal(AstLiteral::String(s)) => &s.node,
        _ => "",
    }
}
