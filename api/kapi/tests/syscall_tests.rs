// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Opal Kernel Developers

//! End-to-end syscall scenarios against in-memory collaborators.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use kapi::SyscallContext;
use kapi::sched::Scheduler;
use kapi::syscall::fs::{
    MAX_RW_CHUNK, sys_close, sys_dup2, sys_lseek, sys_open, sys_read, sys_write,
};
use kapi::syscall::task::{sys_exit, sys_fork, sys_getpid, sys_waitpid};
use kerrno::{KError, KResult};
use kfile::OpenFlags;
use kproc::{AddrSpace, Pid, Process, ProcessTable};
use kvnode::testing::MemoryFs;

struct TestSpace;

impl AddrSpace for TestSpace {
    fn fork(&self) -> KResult<Arc<dyn AddrSpace>> {
        Ok(Arc::new(TestSpace))
    }
}

struct InlineSched;

impl Scheduler for InlineSched {
    fn spawn_forked(&self, _child: &Arc<Process>) -> KResult<()> {
        Ok(())
    }
}

struct RefusingSched;

impl Scheduler for RefusingSched {
    fn spawn_forked(&self, _child: &Arc<Process>) -> KResult<()> {
        Err(KError::NoMemory)
    }
}

struct Kernel {
    table: ProcessTable,
    fs: MemoryFs,
    mem: kapi::uspace::DirectMem,
    sched: InlineSched,
}

impl Kernel {
    fn new() -> (Self, Arc<Process>) {
        let _ = env_logger::builder().is_test(true).try_init();
        let kernel = Kernel {
            table: ProcessTable::new(),
            fs: MemoryFs::new(),
            mem: kapi::uspace::DirectMem,
            sched: InlineSched,
        };
        let boot = kernel.table.init_boot(Arc::new(TestSpace));
        (kernel, boot)
    }

    fn ctx(&self, proc: &Arc<Process>) -> SyscallContext<'_> {
        SyscallContext {
            proc: proc.clone(),
            table: &self.table,
            fs: &self.fs,
            mem: &self.mem,
            sched: &self.sched,
        }
    }

    fn ctx_with_sched<'a>(
        &'a self,
        proc: &Arc<Process>,
        sched: &'a dyn Scheduler,
    ) -> SyscallContext<'a> {
        SyscallContext {
            proc: proc.clone(),
            table: &self.table,
            fs: &self.fs,
            mem: &self.mem,
            sched,
        }
    }

    fn fork(&self, parent: &Arc<Process>) -> Arc<Process> {
        let pid = sys_fork(&self.ctx(parent)).unwrap() as Pid;
        self.table.lookup(pid).unwrap()
    }
}

fn cpath(path: &str) -> Vec<u8> {
    let mut bytes = path.as_bytes().to_vec();
    bytes.push(0);
    bytes
}

fn open(ctx: &SyscallContext, path: &str, flags: OpenFlags) -> KResult<i32> {
    let path = cpath(path);
    sys_open(ctx, path.as_ptr() as usize, flags.bits()).map(|fd| fd as i32)
}

fn write(ctx: &SyscallContext, fd: i32, data: &[u8]) -> KResult<isize> {
    sys_write(ctx, fd, data.as_ptr() as usize, data.len())
}

fn read(ctx: &SyscallContext, fd: i32, len: usize) -> KResult<Vec<u8>> {
    let mut buf = vec![0u8; len];
    let n = sys_read(ctx, fd, buf.as_mut_ptr() as usize, len)?;
    buf.truncate(n as usize);
    Ok(buf)
}

fn waitpid(ctx: &SyscallContext, pid: Pid) -> KResult<(isize, i32)> {
    let mut status: i32 = 0;
    let got = sys_waitpid(ctx, pid as i32, &mut status as *mut i32 as usize, 0)?;
    Ok((got, status))
}

#[test]
fn open_write_seek_read_round_trip() {
    let (kernel, boot) = Kernel::new();
    let ctx = kernel.ctx(&boot);

    let fd = open(&ctx, "/log", OpenFlags::RDWR | OpenFlags::CREAT).unwrap();
    assert_eq!(fd, 0);
    assert_eq!(write(&ctx, fd, b"hello world").unwrap(), 11);
    assert_eq!(sys_lseek(&ctx, fd, 6, 0).unwrap(), 6);
    assert_eq!(read(&ctx, fd, 16).unwrap(), b"world");
    assert_eq!(sys_lseek(&ctx, fd, -5, 2).unwrap(), 6);
    assert_eq!(sys_close(&ctx, fd).unwrap(), 0);
    assert_eq!(kernel.fs.node("/log").unwrap().close_count(), 1);
}

#[test]
fn flag_validation_precedes_path_access_and_allocation() {
    let (kernel, boot) = Kernel::new();
    let ctx = kernel.ctx(&boot);

    // Contradictory access modes lose against a bad path pointer.
    let bad = OpenFlags::RDONLY | OpenFlags::WRONLY;
    assert_eq!(sys_open(&ctx, 0, bad.bits()), Err(KError::InvalidInput));
    // Unknown flag bits are rejected the same way.
    assert_eq!(sys_open(&ctx, 0, 0x8000_0000), Err(KError::InvalidInput));
    // A valid flag word then surfaces the pointer fault, still before any
    // slot is claimed.
    assert_eq!(
        sys_open(&ctx, 0, OpenFlags::RDONLY.bits()),
        Err(KError::BadAddress)
    );
    assert_eq!(boot.fd_table().free_hint(), 0);
    assert_eq!(boot.fd_table().open_count(), 0);
}

#[test]
fn failed_open_leaves_no_slot_behind() {
    let (kernel, boot) = Kernel::new();
    let ctx = kernel.ctx(&boot);

    assert_eq!(
        open(&ctx, "/missing", OpenFlags::RDONLY),
        Err(KError::NotFound)
    );
    assert_eq!(boot.fd_table().open_count(), 0);
    // The cancelled reservation is reused by the next open.
    kernel.fs.add_file("/present", b"x");
    assert_eq!(open(&ctx, "/present", OpenFlags::RDONLY).unwrap(), 0);
}

#[test]
fn append_opens_at_end_of_file() {
    let (kernel, boot) = Kernel::new();
    let ctx = kernel.ctx(&boot);
    kernel.fs.add_file("/notes", b"first\n");

    let fd = open(&ctx, "/notes", OpenFlags::WRONLY | OpenFlags::APPEND).unwrap();
    write(&ctx, fd, b"second\n").unwrap();
    assert_eq!(kernel.fs.node("/notes").unwrap().contents(), b"first\nsecond\n");
}

#[test]
fn oversized_transfer_requests_come_back_short() {
    let (kernel, boot) = Kernel::new();
    kernel.fs.add_file("/small", b"tiny");
    let ctx = kernel.ctx(&boot);
    let fd = open(&ctx, "/small", OpenFlags::RDWR).unwrap();

    // The kernel buffer is sized by the chunk bound, not by the request.
    let mut buf = [0u8; 8];
    let n = sys_read(&ctx, fd, buf.as_mut_ptr() as usize, usize::MAX >> 1).unwrap();
    assert_eq!(n, 4);
    assert_eq!(&buf[..4], b"tiny");

    // A write past the bound is a short transfer, not an error.
    let big = vec![7u8; MAX_RW_CHUNK + 5];
    sys_lseek(&ctx, fd, 0, 0).unwrap();
    let n = sys_write(&ctx, fd, big.as_ptr() as usize, big.len()).unwrap();
    assert_eq!(n as usize, MAX_RW_CHUNK);
}

#[test]
fn dup2_aliases_share_offset_and_close_once() {
    let (kernel, boot) = Kernel::new();
    let ctx = kernel.ctx(&boot);
    kernel.fs.add_file("/data", b"0123456789");

    let fd = open(&ctx, "/data", OpenFlags::RDONLY).unwrap();
    assert_eq!(sys_dup2(&ctx, fd, 5).unwrap(), 5);
    assert_eq!(read(&ctx, fd, 4).unwrap(), b"0123");
    // The alias continues where the original stopped.
    assert_eq!(read(&ctx, 5, 4).unwrap(), b"4567");

    let node = kernel.fs.node("/data").unwrap();
    sys_close(&ctx, fd).unwrap();
    assert_eq!(node.close_count(), 0);
    assert_eq!(read(&ctx, 5, 4).unwrap(), b"89");
    sys_close(&ctx, 5).unwrap();
    assert_eq!(node.close_count(), 1);
}

#[test]
fn fork_shares_open_file_offsets() {
    let (kernel, boot) = Kernel::new();
    kernel.fs.add_file("/shared", b"abcdefgh");
    let parent_ctx = kernel.ctx(&boot);
    let fd = open(&parent_ctx, "/shared", OpenFlags::RDWR).unwrap();
    assert_eq!(read(&parent_ctx, fd, 2).unwrap(), b"ab");

    let child = kernel.fork(&boot);
    let child_ctx = kernel.ctx(&child);
    // The child's descriptor aliases the same open-file instance.
    assert_eq!(read(&child_ctx, fd, 2).unwrap(), b"cd");
    assert_eq!(read(&parent_ctx, fd, 2).unwrap(), b"ef");
    write(&child_ctx, fd, b"XY").unwrap();
    assert_eq!(read(&parent_ctx, fd, 4).unwrap(), b"");
    assert_eq!(kernel.fs.node("/shared").unwrap().contents(), b"abcdefXY");
}

#[test]
fn getpid_reports_each_process() {
    let (kernel, boot) = Kernel::new();
    assert_eq!(sys_getpid(&kernel.ctx(&boot)).unwrap(), 1);
    let child = kernel.fork(&boot);
    assert_eq!(sys_getpid(&kernel.ctx(&child)).unwrap(), child.pid() as isize);
}

#[test]
fn exit_status_reaches_waitpid_and_frees_the_pid() {
    let (kernel, boot) = Kernel::new();
    let child = kernel.fork(&boot);
    let pid = child.pid();

    sys_exit(&kernel.ctx(&child), 3).unwrap();
    let (got, status) = waitpid(&kernel.ctx(&boot), pid).unwrap();
    assert_eq!(got, pid as isize);
    assert_eq!(status, 0x300);

    // Collected: the pid is gone, a second wait cannot find it.
    assert!(kernel.table.lookup(pid).is_none());
    assert_eq!(
        waitpid(&kernel.ctx(&boot), pid),
        Err(KError::NoSuchProcess)
    );
}

#[test]
fn waitpid_may_discard_the_status() {
    let (kernel, boot) = Kernel::new();
    let child = kernel.fork(&boot);
    let pid = child.pid();
    sys_exit(&kernel.ctx(&child), 9).unwrap();
    // Null status pointer means the caller does not want the word.
    assert_eq!(
        sys_waitpid(&kernel.ctx(&boot), pid as i32, 0, 0).unwrap(),
        pid as isize
    );
}

#[test]
fn waitpid_blocks_until_the_child_exits() {
    let (kernel, boot) = Kernel::new();
    let child = kernel.fork(&boot);
    let pid = child.pid();

    thread::scope(|scope| {
        let waiter = scope.spawn(|| waitpid(&kernel.ctx(&boot), pid).unwrap());
        thread::sleep(Duration::from_millis(20));
        sys_exit(&kernel.ctx(&child), 5).unwrap();
        let (got, status) = waiter.join().unwrap();
        assert_eq!(got, pid as isize);
        assert_eq!(status, 0x500);
    });
}

#[test]
fn waitpid_rejects_anything_but_a_direct_child() {
    let (kernel, boot) = Kernel::new();
    let middle = kernel.fork(&boot);
    let grandchild = kernel.fork(&middle);

    // Grandchildren are not children, exited or not.
    assert_eq!(
        waitpid(&kernel.ctx(&boot), grandchild.pid()),
        Err(KError::NoChildProcess)
    );
    sys_exit(&kernel.ctx(&grandchild), 0).unwrap();
    assert_eq!(
        waitpid(&kernel.ctx(&boot), grandchild.pid()),
        Err(KError::NoChildProcess)
    );

    // Nor is the caller its own child, and unknown pids do not exist.
    assert_eq!(
        waitpid(&kernel.ctx(&boot), boot.pid()),
        Err(KError::NoChildProcess)
    );
    assert_eq!(waitpid(&kernel.ctx(&boot), 999), Err(KError::NoSuchProcess));

    // Unsupported option words are rejected up front.
    assert_eq!(
        sys_waitpid(&kernel.ctx(&boot), middle.pid() as i32, 0, 1),
        Err(KError::InvalidInput)
    );
    assert_eq!(
        sys_waitpid(&kernel.ctx(&boot), -1, 0, 0),
        Err(KError::InvalidInput)
    );
}

#[test]
fn scheduler_failure_unwinds_the_fork() {
    let (kernel, boot) = Kernel::new();
    kernel.fs.add_file("/f", b"");
    let ctx = kernel.ctx(&boot);
    let fd = open(&ctx, "/f", OpenFlags::RDONLY).unwrap();

    let refusing = RefusingSched;
    assert_eq!(
        sys_fork(&kernel.ctx_with_sched(&boot, &refusing)),
        Err(KError::NoMemory)
    );
    // No registration survives and the inherited aliases were released.
    assert_eq!(kernel.table.process_count(), 1);
    assert_eq!(boot.fd_table().get(fd as usize).unwrap().ref_count(), 1);

    // The burned pid is not reused.
    let child = kernel.fork(&boot);
    assert!(child.pid() > 2);
}

#[test]
fn exit_releases_every_descriptor() {
    let (kernel, boot) = Kernel::new();
    kernel.fs.add_file("/held", b"");
    let child = kernel.fork(&boot);
    let child_ctx = kernel.ctx(&child);
    open(&child_ctx, "/held", OpenFlags::RDONLY).unwrap();

    sys_exit(&child_ctx, 0).unwrap();
    assert_eq!(kernel.fs.node("/held").unwrap().close_count(), 1);
    waitpid(&kernel.ctx(&boot), child.pid()).unwrap();
}

#[test]
fn orphans_are_reparented_to_the_boot_process() {
    let (kernel, boot) = Kernel::new();
    let middle = kernel.fork(&boot);
    let orphan = kernel.fork(&middle);

    sys_exit(&kernel.ctx(&middle), 0).unwrap();
    waitpid(&kernel.ctx(&boot), middle.pid()).unwrap();

    // The boot process inherited the orphan and may collect it.
    sys_exit(&kernel.ctx(&orphan), 7).unwrap();
    let (_, status) = waitpid(&kernel.ctx(&boot), orphan.pid()).unwrap();
    assert_eq!(status, 0x700);
}

#[test]
fn exit_discards_zombie_children_nobody_can_collect() {
    let (kernel, boot) = Kernel::new();
    let middle = kernel.fork(&boot);
    let zombie = kernel.fork(&middle);

    sys_exit(&kernel.ctx(&zombie), 1).unwrap();
    sys_exit(&kernel.ctx(&middle), 0).unwrap();
    assert!(kernel.table.lookup(zombie.pid()).is_none());
}

#[test]
fn aliased_writers_are_serialized_by_the_object_lock() {
    let (kernel, boot) = Kernel::new();
    let ctx = kernel.ctx(&boot);
    let fd = open(&ctx, "/out", OpenFlags::WRONLY | OpenFlags::CREAT).unwrap();
    assert_eq!(sys_dup2(&ctx, fd, 9).unwrap(), 9);

    thread::scope(|scope| {
        for (fd, chunk) in [(fd, b"aaaa"), (9, b"bbbb")] {
            let kernel = &kernel;
            let boot = &boot;
            scope.spawn(move || {
                let ctx = kernel.ctx(boot);
                for _ in 0..50 {
                    assert_eq!(write(&ctx, fd, chunk).unwrap(), 4);
                }
            });
        }
    });

    let contents = kernel.fs.node("/out").unwrap().contents();
    assert_eq!(contents.len(), 400);
    // Writes through the shared offset never interleave within a chunk.
    for chunk in contents.chunks(4) {
        assert!(chunk == b"aaaa" || chunk == b"bbbb");
    }
}
