//! making a definition tree into an executable unit

use std::collections::HashSet;

use crate::error::{Error, ErrorKind};
use crate::parse::{ExprKind, FuncDef, Stmt, StmtKind};

/// Checks a definition compiles: parameters are distinct, defaults are
/// trailing, and nothing assigns to anything but a plain name. The last
/// one is how a pinned reference that was spliced into assignment-target
/// position gets rejected.
pub fn check_def(def: &FuncDef) -> Result<(), Error> {
    let mut seen = HashSet::new();
    let mut defaulted = false;
    for param in &def.params {
        if !seen.insert(&param.name) {
            return Err(Error(
                param.loc.clone(),
                ErrorKind::DuplicateParam {
                    name: param.name.clone(),
                },
            ));
        }
        match &param.default {
            Some(_) => defaulted = true,
            None if defaulted => {
                return Err(Error(
                    param.loc.clone(),
                    ErrorKind::ParamAfterDefault {
                        name: param.name.clone(),
                    },
                ))
            }
            None => {}
        }
    }

    check_block(&def.body)
}

fn check_block(stmts: &[Stmt]) -> Result<(), Error> {
    for stmt in stmts {
        match &stmt.1 {
            StmtKind::Assign { target, .. } => {
                if !matches!(target.1, ExprKind::Name(_)) {
                    return Err(Error(target.0.clone(), ErrorKind::InvalidAssignTarget));
                }
            }

            StmtKind::If { then, otherwise, .. } => {
                check_block(then)?;
                check_block(otherwise)?;
            }
            StmtKind::While { body, .. } => check_block(body)?,

            StmtKind::Expr(_) | StmtKind::Return(_) => {}
        }
    }
    Ok(())
}
