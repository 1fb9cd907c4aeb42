use glam::{Mat3, Mat4, Vec3, Vec4};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BufferError {
    #[error("write of {stride} floats at offset {offset} overflows a block of {capacity} floats")]
    Overflow {
        offset: usize,
        stride: usize,
        capacity: usize,
    },
}

/// Host-side float array filled sequentially through a write cursor.
///
/// Vectors take 4 slots, a 3x3 matrix takes 12 (each column padded to 4) and
/// a 4x4 matrix takes 16. Padding slots are left as they were.
#[derive(Debug, Clone, PartialEq)]
pub struct DataBlock {
    data: Vec<f32>,
    offset: usize,
}

impl DataBlock {
    /// A zero-filled block of `len` floats.
    pub fn new(len: usize) -> Self {
        Self {
            data: vec![0.0; len],
            offset: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current write cursor, in floats.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }

    fn reserve(&mut self, stride: usize) -> Result<usize, BufferError> {
        let start = self.offset;
        if start + stride > self.data.len() {
            return Err(BufferError::Overflow {
                offset: start,
                stride,
                capacity: self.data.len(),
            });
        }
        self.offset += stride;
        Ok(start)
    }

    pub fn set_vec3(&mut self, value: Vec3, normalize: bool) -> Result<(), BufferError> {
        let value = if normalize { value.normalize_or_zero() } else { value };
        let at = self.reserve(4)?;
        self.data[at..at + 3].copy_from_slice(&value.to_array());
        Ok(())
    }

    pub fn set_vec4(&mut self, value: Vec4) -> Result<(), BufferError> {
        let at = self.reserve(4)?;
        self.data[at..at + 4].copy_from_slice(&value.to_array());
        Ok(())
    }

    pub fn set_mat3(&mut self, value: &Mat3) -> Result<(), BufferError> {
        let at = self.reserve(12)?;
        for (i, column) in value.to_cols_array_2d().iter().enumerate() {
            let start = at + i * 4;
            self.data[start..start + 3].copy_from_slice(column);
        }
        Ok(())
    }

    pub fn set_mat4(&mut self, value: &Mat4) -> Result<(), BufferError> {
        let at = self.reserve(16)?;
        self.data[at..at + 16].copy_from_slice(&value.to_cols_array());
        Ok(())
    }

    /// Write up to four scalars into one 4-slot entry.
    ///
    /// With `normalize`, the first three components are normalized and the
    /// fourth is written as given.
    pub fn set_value(&mut self, values: [f32; 4], normalize: bool) -> Result<(), BufferError> {
        let mut values = values;
        if normalize {
            let n = Vec3::new(values[0], values[1], values[2]).normalize_or_zero();
            values[..3].copy_from_slice(&n.to_array());
        }
        let at = self.reserve(4)?;
        self.data[at..at + 4].copy_from_slice(&values);
        Ok(())
    }

    /// Copy `data` to the start of the block and reset the cursor.
    pub fn set_data(&mut self, data: &[f32]) -> Result<(), BufferError> {
        if data.len() > self.data.len() {
            return Err(BufferError::Overflow {
                offset: 0,
                stride: data.len(),
                capacity: self.data.len(),
            });
        }
        self.data[..data.len()].copy_from_slice(data);
        self.offset = 0;
        Ok(())
    }
}
