//! Integration tests for attaching to real processes

use memory_modder::{MemoryEngine, MemoryError, ProcessHandle};

#[test]
fn test_self_attach_is_refused() {
    let pid = std::process::id();

    assert!(matches!(
        ProcessHandle::open(pid),
        Err(MemoryError::SelfAttachRefused(p)) if p == pid
    ));

    let err = MemoryEngine::attach(pid).err().unwrap();
    assert!(err.is_attach_failure());
    assert_eq!(err.user_message(), "The process cannot be used.");
}

#[test]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn test_attach_to_missing_process_fails() {
    let result = ProcessHandle::open(0x7FFF_FFF0);
    assert!(result.unwrap_err().is_attach_failure());
}

#[cfg(target_os = "linux")]
mod linux {
    use memory_modder::{Address, Comparison, MemoryEngine, MemoryError, ProcessHandle};

    /// Forked copy of this process, killed and reaped on drop
    struct Child {
        pid: libc::pid_t,
    }

    impl Child {
        /// Forks a child that sleeps until killed
        fn spawn_paused() -> Child {
            let pid = unsafe { libc::fork() };
            assert!(pid >= 0, "fork failed");
            if pid == 0 {
                loop {
                    unsafe {
                        libc::pause();
                    }
                }
            }
            Child { pid }
        }

        /// Forks a child that exits at once and is left unreaped
        fn spawn_zombie() -> Child {
            let pid = unsafe { libc::fork() };
            assert!(pid >= 0, "fork failed");
            if pid == 0 {
                unsafe { libc::_exit(0) };
            }
            // Wait for the exit without reaping
            let mut info: libc::siginfo_t = unsafe { std::mem::zeroed() };
            unsafe {
                libc::waitid(
                    libc::P_PID,
                    pid as libc::id_t,
                    &mut info,
                    libc::WEXITED | libc::WNOWAIT,
                );
            }
            Child { pid }
        }

        fn pid(&self) -> u32 {
            self.pid as u32
        }
    }

    impl Drop for Child {
        fn drop(&mut self) {
            unsafe {
                libc::kill(self.pid, libc::SIGKILL);
                libc::waitpid(self.pid, std::ptr::null_mut(), 0);
            }
        }
    }

    #[test]
    fn test_scan_filter_write_in_child() {
        // After fork the child's copy of this allocation sits at the same address
        let marker = Box::new(0x5A17_C0DEu32);
        let address = Address::new(&*marker as *const u32 as usize);

        let child = Child::spawn_paused();
        let engine = match MemoryEngine::attach(child.pid()) {
            Ok(engine) => engine,
            Err(MemoryError::ProcessUnavailable { reason, .. }) => {
                eprintln!("skipping: cannot open child memory: {}", reason);
                return;
            }
            Err(e) => panic!("attach failed: {}", e),
        };

        assert_eq!(engine.process().pid(), child.pid());
        assert!(!engine.process().name().is_empty());

        let list = engine.scan::<u32>(true).unwrap();
        assert!(list.contains(address));

        let found = engine
            .filter(&list, Comparison::Equals, 0x5A17_C0DE)
            .unwrap();
        assert!(found.contains(address));
        assert!(found.size() <= list.size());

        engine.write::<u32>(address, 0x5A17_C0DF).unwrap();
        assert_eq!(engine.read::<u32>(address).unwrap(), 0x5A17_C0DF);

        // Only the child's copy changed
        assert_eq!(*marker, 0x5A17_C0DE);

        let narrowed = engine
            .filter(&found, Comparison::Equals, 0x5A17_C0DF)
            .unwrap();
        assert_eq!(narrowed.all_addresses(), vec![address]);
    }

    #[test]
    fn test_bulk_transfer_in_child() {
        let values = vec![1i64, -2, 3, -4];
        let address = Address::new(values.as_ptr() as usize);

        let child = Child::spawn_paused();
        let handle = match ProcessHandle::open(child.pid()) {
            Ok(handle) => handle,
            Err(MemoryError::ProcessUnavailable { .. }) => return,
            Err(e) => panic!("attach failed: {}", e),
        };

        use memory_modder::ProcessMemory;
        let mut read_back = [0i64; 4];
        handle.read_bulk(address, &mut read_back).unwrap();
        assert_eq!(read_back.to_vec(), values);

        handle.write_bulk(address, &[9i64, 8, 7, 6]).unwrap();
        handle.read_bulk(address, &mut read_back).unwrap();
        assert_eq!(read_back, [9, 8, 7, 6]);

        // Unmapped page zero
        assert!(matches!(
            handle.read::<u32>(Address::null()),
            Err(MemoryError::AddressOutOfRange { .. })
        ));
    }

    #[test]
    fn test_exited_process_is_not_running() {
        let zombie = Child::spawn_zombie();

        match ProcessHandle::open(zombie.pid()) {
            Err(MemoryError::ProcessNotRunning(pid)) => assert_eq!(pid, zombie.pid()),
            // Some sandboxes refuse to open the memory of any other process
            Err(MemoryError::ProcessUnavailable { .. }) => {}
            other => panic!("Expected ProcessNotRunning, got {:?}", other),
        }
    }
}
