//! Process owner lookup through the access token
//!
//! OpenProcessToken -> GetTokenInformation(TokenUser) -> LookupAccountSidW,
//! each using the two-phase size query the APIs expect.

use windows::core::{PCWSTR, PWSTR};
use windows::Win32::Security::{
    GetTokenInformation, LookupAccountSidW, TokenUser, SID_NAME_USE, TOKEN_USER,
};

use crate::ffi::{ProcessHandle, TokenHandle};

use super::wide_to_string;

/// Account name (without domain) owning the process, if it can be read.
pub fn process_user_name(process: &ProcessHandle) -> Option<String> {
    let token = TokenHandle::open_query(process).ok()?;

    let mut needed = 0u32;
    // SAFETY: a null buffer with size 0 is the documented way to query the size.
    let _ = unsafe { GetTokenInformation(token.as_raw(), TokenUser, None, 0, &mut needed) };
    if needed == 0 {
        return None;
    }

    let mut buf = vec![0u8; needed as usize];
    // SAFETY: `buf` is writable for `needed` bytes.
    unsafe {
        GetTokenInformation(
            token.as_raw(),
            TokenUser,
            Some(buf.as_mut_ptr() as *mut _),
            needed,
            &mut needed,
        )
    }
    .ok()?;

    // SAFETY: `buf` starts with a TOKEN_USER written by GetTokenInformation;
    // Vec<u8> is not aligned for it, hence read_unaligned. The SID it points
    // to lives inside `buf`, which outlives the lookups below.
    let token_user = unsafe { std::ptr::read_unaligned(buf.as_ptr() as *const TOKEN_USER) };
    let sid = token_user.User.Sid;

    let mut name_len = 0u32;
    let mut domain_len = 0u32;
    let mut use_type = SID_NAME_USE(0);

    // SAFETY: size query with null output buffers.
    let _ = unsafe {
        LookupAccountSidW(
            PCWSTR::null(),
            sid,
            PWSTR::null(),
            &mut name_len,
            PWSTR::null(),
            &mut domain_len,
            &mut use_type,
        )
    };
    if name_len == 0 {
        return None;
    }

    let mut name_buf = vec![0u16; name_len as usize + 1];
    let mut domain_buf = vec![0u16; domain_len as usize + 1];

    // SAFETY: both buffers are sized from the query above.
    unsafe {
        LookupAccountSidW(
            PCWSTR::null(),
            sid,
            PWSTR(name_buf.as_mut_ptr()),
            &mut name_len,
            PWSTR(domain_buf.as_mut_ptr()),
            &mut domain_len,
            &mut use_type,
        )
    }
    .ok()?;

    let name = wide_to_string(&name_buf);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
