use menrich_core::models::GenomicInterval;

/// Anything with a chromosome and half-open `[start, end)` coordinates.
pub trait GenomicRange {
    fn chrom(&self) -> &str;
    fn start(&self) -> u32;
    fn end(&self) -> u32;
}

impl GenomicRange for GenomicInterval {
    #[inline]
    fn chrom(&self) -> &str {
        &self.chrom
    }

    #[inline]
    fn start(&self) -> u32 {
        self.start
    }

    #[inline]
    fn end(&self) -> u32 {
        self.end
    }
}

impl<R: GenomicRange + ?Sized> GenomicRange for &R {
    #[inline]
    fn chrom(&self) -> &str {
        (**self).chrom()
    }

    #[inline]
    fn start(&self) -> u32 {
        (**self).start()
    }

    #[inline]
    fn end(&self) -> u32 {
        (**self).end()
    }
}
