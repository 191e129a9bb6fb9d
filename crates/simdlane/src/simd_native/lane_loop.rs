//! Register-loop macros shared by the hardware backends.
//!
//! Each macro expands to one kernel with the standard signature that walks
//! `lanes` in steps of one register. The ISA is passed in as the
//! `target_feature` string, the register width in bytes, and the load/store
//! intrinsics, so the same loop shape serves AVX2, AVX-512 and NEON.
//!
//! Operations passed as `$op` are plain functions over registers; they must
//! be callable under `$feat`.

/// `out[i] = op(a[i])`.
macro_rules! unary_kernel {
    ($feat:literal, $bytes:expr, $name:ident, $t:ty, $load:path, $store:path, $op:path) => {
        #[target_feature(enable = $feat)]
        pub(crate) unsafe fn $name(a: *const $t, out: *mut $t, lanes: usize) {
            const STEP: usize = $bytes / ::std::mem::size_of::<$t>();
            debug_assert_eq!(lanes % STEP, 0);
            let mut i = 0;
            while i < lanes {
                $store(out.add(i).cast(), $op($load(a.add(i).cast())));
                i += STEP;
            }
        }
    };
}

/// `out[i] = op(a[i], b[i])`.
macro_rules! binary_kernel {
    ($feat:literal, $bytes:expr, $name:ident, $t:ty, $load:path, $store:path, $op:path) => {
        #[target_feature(enable = $feat)]
        pub(crate) unsafe fn $name(a: *const $t, b: *const $t, out: *mut $t, lanes: usize) {
            const STEP: usize = $bytes / ::std::mem::size_of::<$t>();
            debug_assert_eq!(lanes % STEP, 0);
            let mut i = 0;
            while i < lanes {
                let va = $load(a.add(i).cast());
                let vb = $load(b.add(i).cast());
                $store(out.add(i).cast(), $op(va, vb));
                i += STEP;
            }
        }
    };
}

/// `out[i] = op(a[i], b[i], c[i])`.
macro_rules! ternary_kernel {
    ($feat:literal, $bytes:expr, $name:ident, $t:ty, $load:path, $store:path, $op:path) => {
        #[target_feature(enable = $feat)]
        pub(crate) unsafe fn $name(
            a: *const $t,
            b: *const $t,
            c: *const $t,
            out: *mut $t,
            lanes: usize,
        ) {
            const STEP: usize = $bytes / ::std::mem::size_of::<$t>();
            debug_assert_eq!(lanes % STEP, 0);
            let mut i = 0;
            while i < lanes {
                let va = $load(a.add(i).cast());
                let vb = $load(b.add(i).cast());
                let vc = $load(c.add(i).cast());
                $store(out.add(i).cast(), $op(va, vb, vc));
                i += STEP;
            }
        }
    };
}

/// Writes `op(a[i], b[i])`, a full-lane mask register, to `mask`.
macro_rules! compare_kernel {
    ($feat:literal, $bytes:expr, $name:ident, $t:ty, $load:path, $mstore:path, $op:path) => {
        #[target_feature(enable = $feat)]
        pub(crate) unsafe fn $name(a: *const $t, b: *const $t, mask: *mut u8, lanes: usize) {
            const STEP: usize = $bytes / ::std::mem::size_of::<$t>();
            debug_assert_eq!(lanes % STEP, 0);
            let mut i = 0;
            while i < lanes {
                let m = $op($load(a.add(i).cast()), $load(b.add(i).cast()));
                $mstore(mask.add(i * ::std::mem::size_of::<$t>()).cast(), m);
                i += STEP;
            }
        }
    };
}

/// Folds registers with `combine`, then reduces the last one with `finish`.
macro_rules! reduce_kernel {
    ($feat:literal, $bytes:expr, $name:ident, $t:ty, $load:path, $combine:path, $finish:path) => {
        #[target_feature(enable = $feat)]
        pub(crate) unsafe fn $name(a: *const $t, lanes: usize) -> $t {
            const STEP: usize = $bytes / ::std::mem::size_of::<$t>();
            debug_assert!(lanes >= STEP && lanes % STEP == 0);
            let mut acc = $load(a.cast());
            let mut i = STEP;
            while i < lanes {
                acc = $combine(acc, $load(a.add(i).cast()));
                i += STEP;
            }
            $finish(acc)
        }
    };
}

/// Byte-granular binary kernel over `len` bytes.
macro_rules! byte_binary_kernel {
    ($feat:literal, $bytes:expr, $name:ident, $load:path, $store:path, $op:path) => {
        #[target_feature(enable = $feat)]
        pub(crate) unsafe fn $name(a: *const u8, b: *const u8, out: *mut u8, len: usize) {
            debug_assert_eq!(len % $bytes, 0);
            let mut i = 0;
            while i < len {
                let va = $load(a.add(i).cast());
                let vb = $load(b.add(i).cast());
                $store(out.add(i).cast(), $op(va, vb));
                i += $bytes;
            }
        }
    };
}

/// Conversion kernel; `$step` source lanes per iteration, body sees the
/// current `src`/`dst` pointers.
macro_rules! convert_kernel {
    ($feat:literal, $step:expr, $name:ident, $s:ty => $d:ty, |$src:ident, $dst:ident| $body:block) => {
        #[target_feature(enable = $feat)]
        pub(crate) unsafe fn $name(src: *const $s, dst: *mut $d, lanes: usize) {
            debug_assert_eq!(lanes % $step, 0);
            let mut i = 0;
            while i < lanes {
                let $src = src.add(i);
                let $dst = dst.add(i);
                $body
                i += $step;
            }
        }
    };
}

// Unused on targets without a hardware backend.
#[allow(unused_imports)]
pub(crate) use {
    binary_kernel, byte_binary_kernel, compare_kernel, convert_kernel, reduce_kernel,
    ternary_kernel, unary_kernel,
};
