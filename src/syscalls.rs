//! Static syscall name table for x86_64 Linux.

/// Sentinel name for syscall numbers outside the known table.
pub const UNKNOWN: &str = "unknown";

// Names indexed by syscall number, per `arch/x86/entry/syscalls/syscall_64.tbl`. The
// x86_64 table is dense through `rseq` (334); the next assigned number is 424, and
// anything past the end resolves to `UNKNOWN`.
static NAMES: [&str; 335] = [
    "read", "write", "open", "close", "stat",                                         // 0
    "fstat", "lstat", "poll", "lseek", "mmap",                                        // 5
    "mprotect", "munmap", "brk", "rt_sigaction", "rt_sigprocmask",                    // 10
    "rt_sigreturn", "ioctl", "pread64", "pwrite64", "readv",                          // 15
    "writev", "access", "pipe", "select", "sched_yield",                              // 20
    "mremap", "msync", "mincore", "madvise", "shmget",                                // 25
    "shmat", "shmctl", "dup", "dup2", "pause",                                        // 30
    "nanosleep", "getitimer", "alarm", "setitimer", "getpid",                         // 35
    "sendfile", "socket", "connect", "accept", "sendto",                              // 40
    "recvfrom", "sendmsg", "recvmsg", "shutdown", "bind",                             // 45
    "listen", "getsockname", "getpeername", "socketpair", "setsockopt",               // 50
    "getsockopt", "clone", "fork", "vfork", "execve",                                 // 55
    "exit", "wait4", "kill", "uname", "semget",                                       // 60
    "semop", "semctl", "shmdt", "msgget", "msgsnd",                                   // 65
    "msgrcv", "msgctl", "fcntl", "flock", "fsync",                                    // 70
    "fdatasync", "truncate", "ftruncate", "getdents", "getcwd",                       // 75
    "chdir", "fchdir", "rename", "mkdir", "rmdir",                                    // 80
    "creat", "link", "unlink", "symlink", "readlink",                                 // 85
    "chmod", "fchmod", "chown", "fchown", "lchown",                                   // 90
    "umask", "gettimeofday", "getrlimit", "getrusage", "sysinfo",                     // 95
    "times", "ptrace", "getuid", "syslog", "getgid",                                  // 100
    "setuid", "setgid", "geteuid", "getegid", "setpgid",                              // 105
    "getppid", "getpgrp", "setsid", "setreuid", "setregid",                           // 110
    "getgroups", "setgroups", "setresuid", "getresuid", "setresgid",                  // 115
    "getresgid", "getpgid", "setfsuid", "setfsgid", "getsid",                         // 120
    "capget", "capset", "rt_sigpending", "rt_sigtimedwait", "rt_sigqueueinfo",        // 125
    "rt_sigsuspend", "sigaltstack", "utime", "mknod", "uselib",                       // 130
    "personality", "ustat", "statfs", "fstatfs", "sysfs",                             // 135
    "getpriority", "setpriority", "sched_setparam", "sched_getparam", "sched_setscheduler", // 140
    "sched_getscheduler", "sched_get_priority_max", "sched_get_priority_min", "sched_rr_get_interval", "mlock", // 145
    "munlock", "mlockall", "munlockall", "vhangup", "modify_ldt",                     // 150
    "pivot_root", "_sysctl", "prctl", "arch_prctl", "adjtimex",                       // 155
    "setrlimit", "chroot", "sync", "acct", "settimeofday",                            // 160
    "mount", "umount2", "swapon", "swapoff", "reboot",                                // 165
    "sethostname", "setdomainname", "iopl", "ioperm", "create_module",                // 170
    "init_module", "delete_module", "get_kernel_syms", "query_module", "quotactl",    // 175
    "nfsservctl", "getpmsg", "putpmsg", "afs_syscall", "tuxcall",                     // 180
    "security", "gettid", "readahead", "setxattr", "lsetxattr",                       // 185
    "fsetxattr", "getxattr", "lgetxattr", "fgetxattr", "listxattr",                   // 190
    "llistxattr", "flistxattr", "removexattr", "lremovexattr", "fremovexattr",        // 195
    "tkill", "time", "futex", "sched_setaffinity", "sched_getaffinity",               // 200
    "set_thread_area", "io_setup", "io_destroy", "io_getevents", "io_submit",         // 205
    "io_cancel", "get_thread_area", "lookup_dcookie", "epoll_create", "epoll_ctl_old", // 210
    "epoll_wait_old", "remap_file_pages", "getdents64", "set_tid_address", "restart_syscall", // 215
    "semtimedop", "fadvise64", "timer_create", "timer_settime", "timer_gettime",      // 220
    "timer_getoverrun", "timer_delete", "clock_settime", "clock_gettime", "clock_getres", // 225
    "clock_nanosleep", "exit_group", "epoll_wait", "epoll_ctl", "tgkill",             // 230
    "utimes", "vserver", "mbind", "set_mempolicy", "get_mempolicy",                   // 235
    "mq_open", "mq_unlink", "mq_timedsend", "mq_timedreceive", "mq_notify",           // 240
    "mq_getsetattr", "kexec_load", "waitid", "add_key", "request_key",                // 245
    "keyctl", "ioprio_set", "ioprio_get", "inotify_init", "inotify_add_watch",        // 250
    "inotify_rm_watch", "migrate_pages", "openat", "mkdirat", "mknodat",              // 255
    "fchownat", "futimesat", "newfstatat", "unlinkat", "renameat",                    // 260
    "linkat", "symlinkat", "readlinkat", "fchmodat", "faccessat",                     // 265
    "pselect6", "ppoll", "unshare", "set_robust_list", "get_robust_list",             // 270
    "splice", "tee", "sync_file_range", "vmsplice", "move_pages",                     // 275
    "utimensat", "epoll_pwait", "signalfd", "timerfd_create", "eventfd",              // 280
    "fallocate", "timerfd_settime", "timerfd_gettime", "accept4", "signalfd4",        // 285
    "eventfd2", "epoll_create1", "dup3", "pipe2", "inotify_init1",                    // 290
    "preadv", "pwritev", "rt_tgsigqueueinfo", "perf_event_open", "recvmmsg",          // 295
    "fanotify_init", "fanotify_mark", "prlimit64", "name_to_handle_at", "open_by_handle_at", // 300
    "clock_adjtime", "syncfs", "sendmmsg", "setns", "getcpu",                         // 305
    "process_vm_readv", "process_vm_writev", "kcmp", "finit_module", "sched_setattr", // 310
    "sched_getattr", "renameat2", "seccomp", "getrandom", "memfd_create",             // 315
    "kexec_file_load", "bpf", "execveat", "userfaultfd", "membarrier",                // 320
    "mlock2", "copy_file_range", "preadv2", "pwritev2", "pkey_mprotect",              // 325
    "pkey_alloc", "pkey_free", "statx", "io_pgetevents", "rseq",                      // 330
];

/// Resolve a syscall number to its canonical name.
///
/// Lookup is a direct index into a fixed table. Out-of-range numbers resolve to
/// [`UNKNOWN`] rather than failing.
pub fn name(no: u64) -> &'static str {
    NAMES.get(no as usize).copied().unwrap_or(UNKNOWN)
}
