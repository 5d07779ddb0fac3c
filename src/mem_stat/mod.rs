/// Heap memory owned by a value, beyond its inline size.
///
/// `heap_size` counts allocated capacity, `used_size` only the occupied part.
pub trait MemStat {
    fn heap_size(&self) -> usize;
    fn used_size(&self) -> usize;
}

impl<T: MemStat> MemStat for Option<T> {
    fn heap_size(&self) -> usize {
        self.as_ref().map_or(0, |v| v.heap_size())
    }
    fn used_size(&self) -> usize {
        self.as_ref().map_or(0, |v| v.used_size())
    }
}

impl<T: MemStat> MemStat for Vec<T> {
    fn heap_size(&self) -> usize {
        self.capacity() * std::mem::size_of::<T>()
            + self.iter().map(|v| v.heap_size()).sum::<usize>()
    }
    fn used_size(&self) -> usize {
        self.len() * std::mem::size_of::<T>() + self.iter().map(|v| v.used_size()).sum::<usize>()
    }
}

impl MemStat for String {
    fn heap_size(&self) -> usize {
        self.capacity()
    }
    fn used_size(&self) -> usize {
        self.len()
    }
}

impl<T: MemStat> MemStat for Box<T> {
    fn heap_size(&self) -> usize {
        std::mem::size_of::<T>() + (**self).heap_size()
    }
    fn used_size(&self) -> usize {
        std::mem::size_of::<T>() + (**self).used_size()
    }
}

macro_rules! inline_mem_stat {
    ($($ty:ty),* $(,)?) => {
        $(
            impl MemStat for $ty {
                fn heap_size(&self) -> usize {
                    0
                }
                fn used_size(&self) -> usize {
                    0
                }
            }
        )*
    };
}

inline_mem_stat!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool, char,
    &'static str,
);
