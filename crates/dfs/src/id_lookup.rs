//! Name/id translation for the local filesystem.
//!
//! Ownership crosses the wire as names because HDFS has no numeric ids; the
//! local side therefore needs both directions of the passwd/group database.
//! Lookups use the `_r` variants with a grow-on-ERANGE buffer loop.

use std::ffi::{CStr, CString};
use std::io;
use std::mem::MaybeUninit;
use std::ptr;

pub(crate) fn user_name(uid: u32) -> io::Result<Option<String>> {
    let mut buffer = vec![0_u8; 1024];
    loop {
        let mut pwd = MaybeUninit::<libc::passwd>::zeroed();
        let mut result: *mut libc::passwd = ptr::null_mut();
        // SAFETY: pwd and buffer outlive the call; result is written by libc.
        let rc = unsafe {
            libc::getpwuid_r(
                uid,
                pwd.as_mut_ptr(),
                buffer.as_mut_ptr().cast(),
                buffer.len(),
                &mut result,
            )
        };
        if rc == libc::ERANGE {
            let len = buffer.len() * 2;
            buffer.resize(len, 0);
            continue;
        }
        if rc != 0 {
            return Err(io::Error::from_raw_os_error(rc));
        }
        if result.is_null() {
            return Ok(None);
        }
        // SAFETY: result points into pwd, whose pw_name is a NUL-terminated
        // string inside buffer.
        let name = unsafe { CStr::from_ptr((*result).pw_name) };
        return Ok(Some(name.to_string_lossy().into_owned()));
    }
}

pub(crate) fn group_name(gid: u32) -> io::Result<Option<String>> {
    let mut buffer = vec![0_u8; 1024];
    loop {
        let mut grp = MaybeUninit::<libc::group>::zeroed();
        let mut result: *mut libc::group = ptr::null_mut();
        // SAFETY: grp and buffer outlive the call; result is written by libc.
        let rc = unsafe {
            libc::getgrgid_r(
                gid,
                grp.as_mut_ptr(),
                buffer.as_mut_ptr().cast(),
                buffer.len(),
                &mut result,
            )
        };
        if rc == libc::ERANGE {
            let len = buffer.len() * 2;
            buffer.resize(len, 0);
            continue;
        }
        if rc != 0 {
            return Err(io::Error::from_raw_os_error(rc));
        }
        if result.is_null() {
            return Ok(None);
        }
        // SAFETY: result points into grp, whose gr_name is a NUL-terminated
        // string inside buffer.
        let name = unsafe { CStr::from_ptr((*result).gr_name) };
        return Ok(Some(name.to_string_lossy().into_owned()));
    }
}

pub(crate) fn uid_for(name: &str) -> io::Result<Option<u32>> {
    let c_name = match CString::new(name) {
        Ok(c_name) => c_name,
        Err(_) => return Ok(None),
    };
    let mut buffer = vec![0_u8; 1024];
    loop {
        let mut pwd = MaybeUninit::<libc::passwd>::zeroed();
        let mut result: *mut libc::passwd = ptr::null_mut();
        // SAFETY: c_name, pwd, and buffer outlive the call.
        let rc = unsafe {
            libc::getpwnam_r(
                c_name.as_ptr(),
                pwd.as_mut_ptr(),
                buffer.as_mut_ptr().cast(),
                buffer.len(),
                &mut result,
            )
        };
        if rc == libc::ERANGE {
            let len = buffer.len() * 2;
            buffer.resize(len, 0);
            continue;
        }
        if rc != 0 {
            return Err(io::Error::from_raw_os_error(rc));
        }
        if result.is_null() {
            return Ok(None);
        }
        // SAFETY: result is non-null and points into pwd.
        return Ok(Some(unsafe { (*result).pw_uid }));
    }
}

pub(crate) fn gid_for(name: &str) -> io::Result<Option<u32>> {
    let c_name = match CString::new(name) {
        Ok(c_name) => c_name,
        Err(_) => return Ok(None),
    };
    let mut buffer = vec![0_u8; 1024];
    loop {
        let mut grp = MaybeUninit::<libc::group>::zeroed();
        let mut result: *mut libc::group = ptr::null_mut();
        // SAFETY: c_name, grp, and buffer outlive the call.
        let rc = unsafe {
            libc::getgrnam_r(
                c_name.as_ptr(),
                grp.as_mut_ptr(),
                buffer.as_mut_ptr().cast(),
                buffer.len(),
                &mut result,
            )
        };
        if rc == libc::ERANGE {
            let len = buffer.len() * 2;
            buffer.resize(len, 0);
            continue;
        }
        if rc != 0 {
            return Err(io::Error::from_raw_os_error(rc));
        }
        if result.is_null() {
            return Ok(None);
        }
        // SAFETY: result is non-null and points into grp.
        return Ok(Some(unsafe { (*result).gr_gid }));
    }
}
