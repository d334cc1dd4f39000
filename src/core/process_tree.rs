//! ### 结束进程树
//! svn 可能启动 ssh 等辅助进程，取消时需要连同子孙进程一起结束。
//! unix 上 svn 在独立的进程组中启动，父进程退出后仍能按组结束被收养的子孙进程。

use std::collections::{HashMap, VecDeque};

use sysinfo::{Pid, ProcessesToUpdate, System};
use tokio::process::{Child, Command};

/// All descendants of `root`, deepest first.
pub fn descendants(root: u32) -> Vec<u32> {
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::All, true);

    let mut children: HashMap<Pid, Vec<Pid>> = HashMap::new();
    for (pid, process) in system.processes() {
        if let Some(parent) = process.parent() {
            children.entry(parent).or_default().push(*pid);
        }
    }
    breadth_first(Pid::from_u32(root), &children)
        .into_iter()
        .rev()
        .map(|pid| pid.as_u32())
        .collect()
}

/// 按层遍历，结果由浅到深
fn breadth_first(root: Pid, children: &HashMap<Pid, Vec<Pid>>) -> Vec<Pid> {
    let mut order = Vec::new();
    let mut queue = VecDeque::from([root]);
    while let Some(pid) = queue.pop_front() {
        for kid in children.get(&pid).into_iter().flatten() {
            if *kid != root && !order.contains(kid) {
                order.push(*kid);
                queue.push_back(*kid);
            }
        }
    }
    order
}

/// Whether `pid` still refers to a live (non-zombie) process.
pub fn is_alive(pid: u32) -> bool {
    let mut system = System::new();
    let target = Pid::from_u32(pid);
    system.refresh_processes(ProcessesToUpdate::Some(&[target]), true);
    match system.process(target) {
        Some(process) => process.status() != sysinfo::ProcessStatus::Zombie,
        None => false,
    }
}

/// Start the command as the leader of a new process group.
pub fn isolate(command: &mut Command) {
    #[cfg(unix)]
    command.process_group(0);
    #[cfg(not(unix))]
    let _ = command;
}

/// The process group a spawned child leads. Stays usable after the
/// leader has been reaped, as long as any member is still running.
#[derive(Debug, Clone, Copy)]
pub struct ProcessGroup {
    leader: u32,
}

impl ProcessGroup {
    /// `None` once the child has been reaped.
    pub fn of(child: &Child) -> Option<Self> {
        child.id().map(|leader| ProcessGroup { leader })
    }

    /// SIGKILL every remaining member of the group.
    pub fn kill(&self) {
        #[cfg(unix)]
        {
            let Ok(pgid) = libc::pid_t::try_from(self.leader) else {
                return;
            };
            // SAFETY: kill(2) with a negative pid only signals that group
            let rc = unsafe { libc::kill(-pgid, libc::SIGKILL) };
            if rc != 0 {
                // ESRCH：组内已经没有进程
                log::debug!("kill process group {}: {}", pgid, std::io::Error::last_os_error());
            }
        }
    }
}

/// Kill `child` and every process it spawned, then reap `child`.
pub async fn kill_tree(child: &mut Child, group: Option<ProcessGroup>) {
    if let Some(pid) = child.id() {
        let tree = descendants(pid);
        if !tree.is_empty() {
            let mut system = System::new();
            let pids: Vec<Pid> = tree.iter().map(|p| Pid::from_u32(*p)).collect();
            system.refresh_processes(ProcessesToUpdate::Some(&pids), true);
            for pid in &pids {
                if let Some(process) = system.process(*pid) {
                    if !process.kill() {
                        log::debug!("could not kill descendant process {}", pid);
                    }
                }
            }
        }
        log::debug!("killed process {} and {} descendant(s)", pid, tree.len());
    }
    if let Some(group) = group {
        group.kill();
    }

    if let Err(e) = child.kill().await {
        // 已经退出的进程会返回错误，这里只记录
        log::debug!("kill after cancellation: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breadth_first_visits_levels_in_order() {
        let pid = Pid::from_u32;
        let children = HashMap::from([
            (pid(1), vec![pid(2), pid(3)]),
            (pid(2), vec![pid(4)]),
            (pid(3), vec![pid(5)]),
            (pid(4), vec![pid(6)]),
        ]);
        assert_eq!(breadth_first(pid(1), &children), vec![pid(2), pid(3), pid(4), pid(5), pid(6)]);
        assert!(breadth_first(pid(9), &children).is_empty());
    }

    #[test]
    fn test_descendants_are_deepest_first() {
        let pid = Pid::from_u32;
        let children = HashMap::from([(pid(1), vec![pid(2)]), (pid(2), vec![pid(3)])]);
        let deepest_first: Vec<Pid> = breadth_first(pid(1), &children).into_iter().rev().collect();
        assert_eq!(deepest_first, vec![pid(3), pid(2)]);
    }
}
