//! The cluster bitmap: one byte per cluster, `true` meaning the cluster is
//! FREE. The inverted polarity is part of the image format and is kept
//! isolated behind this allocator.

use crate::error::Result;
use crate::image::ImageDevice;
use crate::structs::SuperBlock;

#[derive(Debug, Clone)]
pub struct Bitmap {
    bits: Vec<bool>,
}

impl Bitmap {
    /// A bitmap for a freshly formatted image, every cluster free.
    pub fn all_free(cluster_count: usize) -> Self {
        Bitmap {
            bits: vec![true; cluster_count],
        }
    }

    /// First-fit allocation: takes the lowest free cluster, or `None` when
    /// the image is full.
    pub fn allocate(&mut self) -> Option<i32> {
        let index = self.bits.iter().position(|&free| free)?;
        self.bits[index] = false;
        Some(index as i32)
    }

    /// Returns a cluster to the pool. Releasing a free cluster is a no-op.
    pub fn release(&mut self, cluster: i32) {
        self.bits[cluster as usize] = true;
    }

    /// Whether at least `n` clusters are free, bailing out as soon as the
    /// n-th one turns up.
    pub fn has_free(&self, n: usize) -> bool {
        if n == 0 {
            return true;
        }
        let mut found = 0;
        for &free in &self.bits {
            if free {
                found += 1;
                if found == n {
                    return true;
                }
            }
        }
        false
    }

    pub fn free_count(&self) -> usize {
        self.bits.iter().filter(|&&free| free).count()
    }

    pub fn load<D: ImageDevice>(device: &D, superblock: &SuperBlock) -> Result<Self> {
        let mut buf = vec![0u8; superblock.cluster_count as usize];
        device.read_at(superblock.bitmap_start as u64, &mut buf)?;
        Ok(Bitmap {
            bits: buf.iter().map(|&b| b != 0).collect(),
        })
    }

    pub fn save<D: ImageDevice>(&self, device: &D, superblock: &SuperBlock) -> Result<()> {
        let buf: Vec<u8> = self.bits.iter().map(|&free| free as u8).collect();
        device.write_at(superblock.bitmap_start as u64, &buf)?;
        device.flush()?;
        Ok(())
    }
}
