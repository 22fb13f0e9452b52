#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessesToUpdate, System};

#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct ResourceSnapshot {
    pub cpu_usage: f32,
    pub memory_mb: u64,
    pub peak_memory_mb: u64,
    pub elapsed: Duration,
}

/// 以 view 為單位記錄 CPU / 記憶體用量
#[cfg(feature = "cli")]
pub struct SystemMonitor {
    inner: Option<MonitorState>,
    started: Instant,
}

#[cfg(feature = "cli")]
struct MonitorState {
    system: Mutex<System>,
    pid: Pid,
    peak_memory_mb: Mutex<u64>,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let inner = if enabled {
            match sysinfo::get_current_pid() {
                Ok(pid) => {
                    let mut system = System::new();
                    system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
                    Some(MonitorState {
                        system: Mutex::new(system),
                        pid,
                        peak_memory_mb: Mutex::new(0),
                    })
                }
                Err(e) => {
                    tracing::warn!("System monitoring unavailable: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Self {
            inner,
            started: Instant::now(),
        }
    }

    pub fn snapshot(&self) -> Option<ResourceSnapshot> {
        let state = self.inner.as_ref()?;
        let mut system = state.system.lock().ok()?;
        system.refresh_processes(ProcessesToUpdate::Some(&[state.pid]), true);
        let process = system.process(state.pid)?;
        let memory_mb = process.memory() / 1024 / 1024;

        let mut peak = state.peak_memory_mb.lock().ok()?;
        *peak = (*peak).max(memory_mb);

        Some(ResourceSnapshot {
            cpu_usage: process.cpu_usage(),
            memory_mb,
            peak_memory_mb: *peak,
            elapsed: self.started.elapsed(),
        })
    }

    pub fn log_phase(&self, view: &str, phase: &str) {
        if let Some(s) = self.snapshot() {
            tracing::info!(
                "📊 {} / {} - CPU: {:.1}%, Memory: {}MB, Peak: {}MB, Time: {:?}",
                view,
                phase,
                s.cpu_usage,
                s.memory_mb,
                s.peak_memory_mb,
                s.elapsed
            );
        }
    }

    pub fn log_final(&self, view: &str) {
        if let Some(s) = self.snapshot() {
            tracing::info!(
                "📊 {} finished - Total Time: {:?}, Peak Memory: {}MB",
                view,
                s.elapsed,
                s.peak_memory_mb
            );
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }
}

#[cfg(feature = "cli")]
impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

// 非 CLI 建置時不追蹤資源
#[cfg(not(feature = "cli"))]
#[derive(Default)]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn log_phase(&self, _view: &str, _phase: &str) {}

    pub fn log_final(&self, _view: &str) {}

    pub fn is_enabled(&self) -> bool {
        false
    }
}
