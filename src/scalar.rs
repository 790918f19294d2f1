//! Element type bounds.

/// Element types storable in views and usable by the arithmetic kernels.
///
/// With the `faer` feature the bound also requires `faer_traits::ComplexField`
/// so every `Scalar` can be handed to the faer matmul kernel.
#[cfg(not(feature = "faer"))]
pub trait Scalar:
    Copy
    + std::fmt::Debug
    + PartialEq
    + std::ops::Add<Output = Self>
    + std::ops::Sub<Output = Self>
    + std::ops::Mul<Output = Self>
    + std::ops::Div<Output = Self>
    + num_traits::Zero
    + num_traits::One
    + 'static
{
}

#[cfg(not(feature = "faer"))]
impl<T> Scalar for T where
    T: Copy
        + std::fmt::Debug
        + PartialEq
        + std::ops::Add<Output = T>
        + std::ops::Sub<Output = T>
        + std::ops::Mul<Output = T>
        + std::ops::Div<Output = T>
        + num_traits::Zero
        + num_traits::One
        + 'static
{
}

/// Element types storable in views and usable by the arithmetic kernels.
#[cfg(feature = "faer")]
pub trait Scalar:
    Copy
    + std::fmt::Debug
    + PartialEq
    + std::ops::Add<Output = Self>
    + std::ops::Sub<Output = Self>
    + std::ops::Mul<Output = Self>
    + std::ops::Div<Output = Self>
    + num_traits::Zero
    + num_traits::One
    + faer_traits::ComplexField
    + 'static
{
}

#[cfg(feature = "faer")]
impl<T> Scalar for T where
    T: Copy
        + std::fmt::Debug
        + PartialEq
        + std::ops::Add<Output = T>
        + std::ops::Sub<Output = T>
        + std::ops::Mul<Output = T>
        + std::ops::Div<Output = T>
        + num_traits::Zero
        + num_traits::One
        + faer_traits::ComplexField
        + 'static
{
}
