//! 采样循环的调度抽象
//!
//! 引擎每次需要下一次采样时调用 `schedule`，宿主在 tick 到期时调用
//! `Multitrack::tick`。`ManualScheduler` 是一个虚拟时钟，测试和 egui 宿主
//! （每帧检查一次）都用它驱动循环。

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TickHandle(pub u64);

pub trait Scheduler {
    fn schedule(&mut self) -> TickHandle;
    fn cancel(&mut self, handle: TickHandle);
}

#[derive(Debug, Default)]
struct ManualSchedulerState {
    next_id: u64,
    pending: Option<TickHandle>,
    cancelled: usize,
}

/// 手动驱动的调度器，克隆体共享同一状态
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<ManualSchedulerState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.state.borrow().pending.is_some()
    }

    /// 取出到期的 tick；返回 `Some` 时宿主应调用一次 `Multitrack::tick`
    pub fn fire(&self) -> Option<TickHandle> {
        self.state.borrow_mut().pending.take()
    }

    /// 被取消的 tick 总数
    pub fn cancelled(&self) -> usize {
        self.state.borrow().cancelled
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self) -> TickHandle {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let handle = TickHandle(state.next_id);
        state.pending = Some(handle);
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        let mut state = self.state.borrow_mut();
        if state.pending == Some(handle) {
            state.pending = None;
            state.cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fire_consumes_pending_tick() {
        let mut scheduler = ManualScheduler::new();
        let host = scheduler.clone();
        let handle = scheduler.schedule();

        assert!(host.is_pending());
        assert_eq!(host.fire(), Some(handle));
        assert_eq!(host.fire(), None);
    }

    #[test]
    fn cancel_ignores_stale_handles() {
        let mut scheduler = ManualScheduler::new();
        let first = scheduler.schedule();
        let second = scheduler.schedule();

        scheduler.cancel(first);
        assert!(scheduler.is_pending());
        assert_eq!(scheduler.cancelled(), 0);

        scheduler.cancel(second);
        assert!(!scheduler.is_pending());
        assert_eq!(scheduler.cancelled(), 1);
    }
}
