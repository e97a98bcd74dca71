use std::slice;

use glow::HasContext;

use crate::error::Error;

/// Uploads an array of elements to a GL buffer as raw bytes.
///
/// # Safety
/// Requires that T:
/// - Has a stable memory layout (use #[repr(C)] or #[repr(transparent)])
/// - Contains only copy types
/// - Has no padding issues that would cause UB
pub(crate) unsafe fn buffer_upload_array<T: Copy>(
    gl: &glow::Context,
    target: u32,
    data: &[T],
    usage: u32,
) {
    unsafe {
        let data_ptr = data.as_ptr() as *const u8;
        let size = size_of_val(data);
        let bytes = slice::from_raw_parts(data_ptr, size);
        gl.buffer_data_u8_slice(target, bytes, usage);
    }
}

/// Creates an `ARRAY_BUFFER`, leaves it bound and fills it with `data`.
pub(crate) fn create_array_buffer<T: Copy>(
    gl: &glow::Context,
    label: &str,
    data: &[T],
    usage: u32,
) -> Result<glow::Buffer, Error> {
    let buffer =
        unsafe { gl.create_buffer() }.map_err(|e| Error::buffer_creation_failed(label, e))?;

    unsafe {
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
        buffer_upload_array(gl, glow::ARRAY_BUFFER, data, usage);
    }

    Ok(buffer)
}

/// Points a float vertex attribute at the currently bound `ARRAY_BUFFER`.
pub(crate) fn enable_vertex_attrib(
    gl: &glow::Context,
    index: u32,
    size: i32,
    offset: i32,
    stride: i32,
) {
    unsafe {
        gl.enable_vertex_attrib_array(index);
        gl.vertex_attrib_pointer_f32(index, size, glow::FLOAT, false, stride, offset);
    }
}
