// Copyright 2023 Daniel Harrison. All Rights Reserved.

//! Core affinity for warehouse-pinned loaders and workers
//!
//! Workers are pinned by their warehouse id so a warehouse's working set
//! stays cache-local. This is an optimization hint, not a correctness
//! requirement: on platforms without affinity syscalls pinning is a no-op
//! and the workload runs unpinned.

/// The number of cpus available to pin against.
#[cfg(target_os = "linux")]
pub fn num_cpus() -> usize {
    let n = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_ONLN) };
    assert!(n >= 1, "sysconf(_SC_NPROCESSORS_ONLN) returned {n}");
    n as usize
}

/// The number of cpus available to pin against.
#[cfg(not(target_os = "linux"))]
pub fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// The core assigned to `warehouse_id`: `(warehouse_id - 1) % num_cpus`.
pub fn assigned_core(warehouse_id: u32) -> usize {
    assert!(warehouse_id >= 1, "warehouse ids are 1-based");
    (warehouse_id as usize - 1) % num_cpus()
}

/// Pins the calling thread to the core assigned to `warehouse_id`.
///
/// Returns whether the pin took effect. Panics if the platform supports
/// pinning but the syscall fails.
#[cfg(target_os = "linux")]
pub fn pin_to_warehouse(warehouse_id: u32) -> bool {
    let core = assigned_core(warehouse_id);
    unsafe {
        let mut cs: libc::cpu_set_t = std::mem::zeroed();
        libc::CPU_ZERO(&mut cs);
        libc::CPU_SET(core, &mut cs);
        let rc = libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &cs);
        assert_eq!(rc, 0, "sched_setaffinity failed for core {core}");
    }
    true
}

/// Pins the calling thread to the core assigned to `warehouse_id`.
#[cfg(not(target_os = "linux"))]
pub fn pin_to_warehouse(warehouse_id: u32) -> bool {
    tracing::debug!(warehouse_id, "core pinning unsupported on this platform");
    false
}

/// Reports whether the calling thread's affinity mask contains exactly
/// the core assigned to `warehouse_id`.
#[cfg(target_os = "linux")]
pub fn is_pinned_to_warehouse(warehouse_id: u32) -> bool {
    let core = assigned_core(warehouse_id);
    unsafe {
        let mut cs: libc::cpu_set_t = std::mem::zeroed();
        libc::CPU_ZERO(&mut cs);
        let rc = libc::sched_getaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &mut cs);
        assert_eq!(rc, 0, "sched_getaffinity failed");
        libc::CPU_ISSET(core, &cs) && libc::CPU_COUNT(&cs) == 1
    }
}

/// Reports whether the calling thread's affinity mask contains exactly
/// the core assigned to `warehouse_id`.
#[cfg(not(target_os = "linux"))]
pub fn is_pinned_to_warehouse(_warehouse_id: u32) -> bool {
    false
}

#[cfg(all(test, target_os = "linux"))]
mod tests {
    use super::*;

    #[test]
    fn pin_is_verifiable() {
        // Pin from a scratch thread so the test runner's thread keeps its
        // mask.
        std::thread::spawn(|| {
            assert!(pin_to_warehouse(1));
            assert!(is_pinned_to_warehouse(1));
            if num_cpus() > 1 {
                assert!(!is_pinned_to_warehouse(2));
            }
        })
        .join()
        .unwrap();
    }
}
