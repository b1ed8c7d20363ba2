use std::io::{self, BufReader, Read};

use byteorder::{BigEndian, ReadBytesExt};

use crate::{constant_pool::ConstantPool, mutf8, ClassScanError};

type Result<T, E = ClassScanError> = std::result::Result<T, E>;
type Endian = BigEndian;

const MAGIC: u32 = 0xCAFEBABE;

const CODE: &str = "Code";
const LINE_NUMBER_TABLE: &str = "LineNumberTable";
const SOURCE_FILE: &str = "SourceFile";

/// Inclusive span of source lines, folded over every line number seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LineRange {
    pub from: u16,
    pub to: u16,
}

impl LineRange {
    fn fold(range: Option<LineRange>, line: u16) -> Option<LineRange> {
        Some(match range {
            Some(r) => LineRange {
                from: r.from.min(line),
                to: r.to.max(line),
            },
            None => LineRange {
                from: line,
                to: line,
            },
        })
    }
}

/// What one pass over a class file yields.
#[derive(Debug)]
pub(crate) struct ScanOutcome {
    pub source_file: Option<String>,
    pub lines: Option<LineRange>,
}

/// Single-pass reader of a class file that extracts the SourceFile name
/// and the line numbers covered by method code, skipping everything else
/// by declared length.
pub(crate) struct Scanner<R> {
    r: BufReader<R>,
}

impl<R: Read> Scanner<R> {
    pub(crate) fn new(r: R) -> Self {
        Self {
            r: BufReader::new(r),
        }
    }

    pub(crate) fn scan(&mut self, method_filter: Option<&str>) -> Result<ScanOutcome> {
        self.scan_magic_identifier()?;
        let version = self.scan_version()?;
        log::trace!("class file version {}.{}", version.0, version.1);

        let constant_pool = self.scan_constant_pool()?;

        // access_flags, this_class, super_class
        self.skip(6)?;
        let interfaces_count = self.read_u16()?;
        self.skip(interfaces_count as u64 * 2)?;

        let fields_count = self.read_u16()?;
        for _ in 0..fields_count {
            // access_flags, name_index, descriptor_index
            self.skip(6)?;
            self.skip_attribute_table()?;
        }

        let lines = self.scan_methods(&constant_pool, method_filter)?;
        let source_file = self.scan_source_file_attribute(&constant_pool)?;

        Ok(ScanOutcome { source_file, lines })
    }

    fn scan_magic_identifier(&mut self) -> Result<()> {
        match self.read_u32()? {
            MAGIC => Ok(()),
            magic_identifier => Err(ClassScanError::InvalidMagicIdentifier(magic_identifier)),
        }
    }

    fn scan_version(&mut self) -> Result<(u16, u16)> {
        let minor = self.read_u16()?;
        let major = self.read_u16()?;
        Ok((major, minor))
    }

    fn scan_constant_pool(&mut self) -> Result<ConstantPool> {
        let constant_pool_count = self.read_u16()?;
        let mut pool = ConstantPool::with_slot_count(constant_pool_count);

        // The cursor is wider than a slot index: a wide entry on slot
        // 65534 of a full pool steps past u16::MAX before the loop ends.
        let mut index: u32 = 1;
        while index < constant_pool_count as u32 {
            let tag = self.read_u8()?;
            let slot_size = match tag {
                // Utf8
                1 => {
                    let length = self.read_u16()?;
                    let mut bytes = vec![0u8; length as usize];
                    self.r.read_exact(&mut bytes)?;
                    pool.put_utf8(index as u16, mutf8::decode(&bytes));
                    1
                }
                // Integer, Float
                3 | 4 => {
                    self.skip(4)?;
                    1
                }
                // Long, Double: the value occupies this slot and the next
                5 | 6 => {
                    self.skip(8)?;
                    2
                }
                // Class: keeps the Utf8 slot it names for the second pass
                7 => {
                    let name_index = self.read_u16()?;
                    pool.defer_class(index as u16, name_index);
                    1
                }
                // String, MethodType
                8 | 16 => {
                    self.skip(2)?;
                    1
                }
                // FieldRef, MethodRef, InterfaceMethodRef, NameAndType,
                // InvokeDynamic
                9 | 10 | 11 | 12 | 18 => {
                    self.skip(4)?;
                    1
                }
                // MethodHandle
                15 => {
                    self.skip(3)?;
                    1
                }
                _ => return Err(ClassScanError::UnsupportedConstantTag(tag)),
            };
            index += slot_size;
        }

        pool.resolve_classes();
        Ok(pool)
    }

    fn scan_methods(
        &mut self,
        constant_pool: &ConstantPool,
        method_filter: Option<&str>,
    ) -> Result<Option<LineRange>> {
        let methods_count = self.read_u16()?;

        // Without both attribute names in the pool no method can carry
        // line numbers, so the whole table is skipped unread.
        if !constant_pool.contains(CODE) || !constant_pool.contains(LINE_NUMBER_TABLE) {
            log::trace!("no Code or LineNumberTable constant, skipping method table");
            for _ in 0..methods_count {
                self.skip(6)?;
                self.skip_attribute_table()?;
            }
            return Ok(None);
        }

        let code_index = constant_pool.index_of(CODE);
        let line_number_table_index = constant_pool.index_of(LINE_NUMBER_TABLE);

        let mut lines = None;
        for _ in 0..methods_count {
            // access_flags
            self.skip(2)?;
            let name_index = self.read_u16()?;
            // descriptor_index
            self.skip(2)?;

            let attributes_count = self.read_u16()?;
            for _ in 0..attributes_count {
                let attribute_name_index = self.read_u16()?;
                let attribute_length = self.read_u32()?;

                let selected = method_filter
                    .map_or(true, |filter| constant_pool.get(name_index) == Some(filter));
                if selected && Some(attribute_name_index) == code_index {
                    lines = self.scan_code_attribute(line_number_table_index, lines)?;
                } else {
                    self.skip(attribute_length as u64)?;
                }
            }
        }

        Ok(lines)
    }

    fn scan_code_attribute(
        &mut self,
        line_number_table_index: Option<u16>,
        mut lines: Option<LineRange>,
    ) -> Result<Option<LineRange>> {
        // max_stack, max_locals
        self.skip(4)?;
        let code_length = self.read_u32()?;
        self.skip(code_length as u64)?;
        let exception_table_length = self.read_u16()?;
        self.skip(exception_table_length as u64 * 8)?;

        let attributes_count = self.read_u16()?;
        for _ in 0..attributes_count {
            let attribute_name_index = self.read_u16()?;
            let attribute_length = self.read_u32()?;

            if Some(attribute_name_index) == line_number_table_index {
                let entry_count = self.read_u16()?;
                for _ in 0..entry_count {
                    // start_pc
                    self.skip(2)?;
                    let line_number = self.read_u16()?;
                    lines = LineRange::fold(lines, line_number);
                }
            } else {
                self.skip(attribute_length as u64)?;
            }
        }

        Ok(lines)
    }

    fn scan_source_file_attribute(
        &mut self,
        constant_pool: &ConstantPool,
    ) -> Result<Option<String>> {
        let attributes_count = self.read_u16()?;
        let source_file_index = constant_pool.index_of(SOURCE_FILE);

        let mut matched = false;
        let mut source_file = None;
        for _ in 0..attributes_count {
            let attribute_name_index = self.read_u16()?;
            let attribute_length = self.read_u32()?;

            // Only the first matching attribute is read, whether or not
            // its index resolves to a string.
            if !matched && Some(attribute_name_index) == source_file_index {
                matched = true;
                let name_index = self.read_u16()?;
                source_file = constant_pool.get(name_index).map(str::to_owned);
            } else {
                self.skip(attribute_length as u64)?;
            }
        }

        Ok(source_file)
    }

    fn skip_attribute_table(&mut self) -> Result<()> {
        let attributes_count = self.read_u16()?;
        for _ in 0..attributes_count {
            // attribute_name_index
            self.skip(2)?;
            let attribute_length = self.read_u32()?;
            self.skip(attribute_length as u64)?;
        }
        Ok(())
    }

    /// Consumes exactly `n` bytes, failing on a short read. All structure
    /// the final answer does not need goes through here: only the declared
    /// length is honored, the content is never interpreted.
    fn skip(&mut self, n: u64) -> Result<()> {
        let skipped = io::copy(&mut (&mut self.r).take(n), &mut io::sink())?;
        if skipped < n {
            return Err(ClassScanError::Truncated);
        }
        Ok(())
    }

    fn read_u32(&mut self) -> Result<u32> {
        Ok(self.r.read_u32::<Endian>()?)
    }

    fn read_u16(&mut self) -> Result<u16> {
        Ok(self.r.read_u16::<Endian>()?)
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.r.read_u8()?)
    }
}
