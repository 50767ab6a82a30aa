use std::collections::HashMap;

use pipkit_core::{PackageName, PipError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mark {
    InProgress,
    Done,
}

struct Frame {
    name: PackageName,
    deps: Vec<PackageName>,
    next: usize,
}

/// Depth-first walk from `root` appending each finished package to `order`
/// after its dependencies. `marks` may be shared across several roots so a
/// package is expanded once per walk. Reaching a package that is still in
/// progress is a cycle.
pub(crate) fn visit_dependency_first<F>(
    root: &PackageName,
    marks: &mut HashMap<PackageName, Mark>,
    order: &mut Vec<PackageName>,
    load_deps: &mut F,
) -> Result<()>
where
    F: FnMut(&PackageName) -> Result<Vec<PackageName>>,
{
    if marks.contains_key(root) {
        return Ok(());
    }

    marks.insert(root.clone(), Mark::InProgress);
    let mut stack = vec![Frame {
        name: root.clone(),
        deps: load_deps(root)?,
        next: 0,
    }];

    loop {
        let Some(frame) = stack.last_mut() else {
            break;
        };
        let next = frame.deps.get(frame.next).cloned();
        frame.next += 1;

        let Some(dep) = next else {
            if let Some(done) = stack.pop() {
                marks.insert(done.name.clone(), Mark::Done);
                order.push(done.name);
            }
            continue;
        };

        match marks.get(&dep) {
            Some(Mark::Done) => {}
            Some(Mark::InProgress) => {
                let start = stack
                    .iter()
                    .position(|frame| frame.name == dep)
                    .unwrap_or(0);
                let mut cycle = stack[start..]
                    .iter()
                    .map(|frame| frame.name.clone())
                    .collect::<Vec<_>>();
                cycle.push(dep);
                return Err(PipError::DependencyCycle { cycle });
            }
            None => {
                marks.insert(dep.clone(), Mark::InProgress);
                let deps = load_deps(&dep)?;
                stack.push(Frame {
                    name: dep,
                    deps,
                    next: 0,
                });
            }
        }
    }

    Ok(())
}
