//! Nested tree rewriting on top of `git2::TreeBuilder`

use std::collections::BTreeMap;

use git2::{FileMode, ObjectType, Oid, Repository, Tree};

use crate::{Error, Result, TreeEdit};

/// Split a tree path into validated components.
pub(crate) fn components(path: &str) -> Result<Vec<&str>> {
    let parts: Vec<&str> = path.split('/').collect();
    for part in &parts {
        if part.is_empty() || *part == "." || *part == ".." || part.contains('\0') {
            return Err(Error::InvalidPath {
                path: path.to_string(),
                message: format!("invalid component '{part}'"),
            });
        }
    }
    Ok(parts)
}

/// Write a new tree equal to `base` with every edit applied.
pub(crate) fn write_edited(
    repo: &Repository,
    base: Option<&Tree<'_>>,
    edits: &[TreeEdit],
) -> Result<Oid> {
    let mut staged = Vec::with_capacity(edits.len());
    for edit in edits {
        staged.push((components(&edit.path)?, edit.blob));
    }
    write_level(repo, base, &staged)
}

fn write_level(repo: &Repository, base: Option<&Tree<'_>>, edits: &[(Vec<&str>, Oid)]) -> Result<Oid> {
    let mut builder = repo.treebuilder(base)?;
    let mut nested: BTreeMap<&str, Vec<(Vec<&str>, Oid)>> = BTreeMap::new();

    for (parts, blob) in edits {
        match parts.as_slice() {
            [name] => {
                builder.insert(*name, *blob, i32::from(FileMode::Blob))?;
            }
            [dir, rest @ ..] => {
                nested
                    .entry(*dir)
                    .or_default()
                    .push((rest.to_vec(), *blob));
            }
            [] => {}
        }
    }

    for (dir, child_edits) in nested {
        let existing = match base.and_then(|tree| tree.get_name(dir)) {
            Some(entry) if entry.kind() == Some(ObjectType::Tree) => {
                Some(repo.find_tree(entry.id())?)
            }
            _ => None,
        };
        let child = write_level(repo, existing.as_ref(), &child_edits)?;
        builder.insert(dir, child, i32::from(FileMode::Tree))?;
    }

    Ok(builder.write()?)
}
