// --- Файл: src/serialization/stream.rs ---

//! Последовательный поток независимо сериализованных значений.
//!
//! Каждое значение пишется отдельным вызовом bincode, без разделителей,
//! версии или контрольной суммы. Читать нужно в том же порядке и с теми же
//! типами, что и при записи. Файл может быть обернут в gzip.

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;

/// Ошибки потока значений
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("Ошибка ввода/вывода: {0}")]
    IoError(#[from] io::Error),

    #[error("Ошибка bincode: {0}")]
    BincodeError(#[from] bincode::Error),
}

type Result<T> = std::result::Result<T, StreamError>;

/// Файл для записи, с gzip или без.
pub enum FileSink {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl FileSink {
    /// Создает (или перезаписывает) файл.
    pub fn create<P: AsRef<Path>>(path: P, gzip: bool) -> io::Result<Self> {
        let file = BufWriter::new(File::create(path)?);
        Ok(if gzip {
            FileSink::Gzip(GzEncoder::new(file, Compression::default()))
        } else {
            FileSink::Plain(file)
        })
    }

    /// Дописывает gzip-трейлер и сбрасывает буферы на диск.
    pub fn finish(self) -> io::Result<()> {
        match self {
            FileSink::Plain(mut file) => file.flush(),
            FileSink::Gzip(encoder) => encoder.finish()?.flush(),
        }
    }
}

impl Write for FileSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            FileSink::Plain(file) => file.write(buf),
            FileSink::Gzip(encoder) => encoder.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            FileSink::Plain(file) => file.flush(),
            FileSink::Gzip(encoder) => encoder.flush(),
        }
    }
}

/// Файл для чтения, с gzip или без.
pub enum FileSource {
    Plain(BufReader<File>),
    Gzip(BufReader<GzDecoder<File>>),
}

impl FileSource {
    pub fn open<P: AsRef<Path>>(path: P, gzip: bool) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(if gzip {
            FileSource::Gzip(BufReader::new(GzDecoder::new(file)))
        } else {
            FileSource::Plain(BufReader::new(file))
        })
    }
}

impl Read for FileSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            FileSource::Plain(file) => file.read(buf),
            FileSource::Gzip(decoder) => decoder.read(buf),
        }
    }
}

/// Пишет значения одно за другим.
pub struct ValueWriter<W: Write> {
    inner: W,
    written: usize,
}

impl<W: Write> ValueWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    /// Сериализует одно значение в конец потока.
    pub fn write<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        bincode::serialize_into(&mut self.inner, value)?;
        self.written += 1;
        Ok(())
    }

    /// Количество записанных значений.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl ValueWriter<FileSink> {
    /// Открывает файл для записи.
    pub fn create<P: AsRef<Path>>(path: P, gzip: bool) -> Result<Self> {
        Ok(Self::new(FileSink::create(path, gzip)?))
    }

    /// Завершает запись. Без этого вызова ошибки при закрытии
    /// gzip-потока теряются.
    pub fn finish(self) -> Result<()> {
        self.inner.finish()?;
        Ok(())
    }
}

/// Читает значения в порядке записи.
pub struct ValueReader<R: Read> {
    inner: R,
    read: usize,
}

impl<R: Read> ValueReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, read: 0 }
    }

    /// Десериализует следующее значение.
    ///
    /// Обрыв потока дает `BincodeError` с `UnexpectedEof` внутри.
    pub fn read<T: DeserializeOwned>(&mut self) -> Result<T> {
        let value = bincode::deserialize_from(&mut self.inner)?;
        self.read += 1;
        Ok(value)
    }

    /// Количество прочитанных значений.
    pub fn values_read(&self) -> usize {
        self.read
    }
}

impl ValueReader<FileSource> {
    /// Открывает файл для чтения.
    pub fn open<P: AsRef<Path>>(path: P, gzip: bool) -> Result<Self> {
        Ok(Self::new(FileSource::open(path, gzip)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    #[test]
    fn test_values_read_back_in_order() {
        let mut writer = ValueWriter::new(Vec::new());
        writer.write("name").unwrap();
        writer.write(&3usize).unwrap();
        writer.write(&Some(vec![1i32, 2])).unwrap();
        writer.write(&None::<String>).unwrap();
        assert_eq!(writer.written(), 4);

        let mut reader = ValueReader::new(Cursor::new(writer.into_inner()));
        assert_eq!(reader.read::<String>().unwrap(), "name");
        assert_eq!(reader.read::<usize>().unwrap(), 3);
        assert_eq!(reader.read::<Option<Vec<i32>>>().unwrap(), Some(vec![1, 2]));
        assert_eq!(reader.read::<Option<String>>().unwrap(), None);
        assert_eq!(reader.values_read(), 4);
    }

    #[test]
    fn test_read_past_end_fails() {
        let mut writer = ValueWriter::new(Vec::new());
        writer.write(&7u64).unwrap();

        let mut reader = ValueReader::new(Cursor::new(writer.into_inner()));
        reader.read::<u64>().unwrap();

        match reader.read::<u64>() {
            Err(StreamError::BincodeError(err)) => match *err {
                bincode::ErrorKind::Io(ref e) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
                ref other => panic!("unexpected bincode error: {:?}", other),
            },
            other => panic!("expected BincodeError, got {:?}", other),
        }
    }

    #[test]
    fn test_gzip_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("values.bin.gz");

        let mut writer = ValueWriter::create(&path, true).unwrap();
        for i in 0..100u32 {
            writer.write(&format!("item-{}", i)).unwrap();
        }
        writer.finish().unwrap();

        // Файл действительно сжат: начинается с сигнатуры gzip
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], &[0x1f, 0x8b]);

        let mut reader = ValueReader::open(&path, true).unwrap();
        for i in 0..100u32 {
            assert_eq!(reader.read::<String>().unwrap(), format!("item-{}", i));
        }
    }

    #[test]
    fn test_plain_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("values.bin");

        let mut writer = ValueWriter::create(&path, false).unwrap();
        writer.write(&[1u8, 2, 3]).unwrap();
        writer.finish().unwrap();

        let mut reader = ValueReader::open(&path, false).unwrap();
        assert_eq!(reader.read::<[u8; 3]>().unwrap(), [1, 2, 3]);
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempdir().unwrap();
        let result = ValueReader::open(dir.path().join("missing.bin"), false);
        assert!(matches!(result, Err(StreamError::IoError(_))));
    }
}
