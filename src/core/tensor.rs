use ndarray::{ArrayD, Axis, IxDyn, Slice};

use crate::error::{BNError, BNResult};

/// Dense n-dimensional array of probabilities or messages
pub type Tensor = ArrayD<f64>;

// ------------------------------------------------------------------------------------------

/// Returns a vector of ones, the neutral element of message combination
///
/// # Arguments
///
/// * `size` - A length of the vector
///
/// # Example
///
/// ```
/// use bnrs::core::tensor::initial;
///
/// let message = initial(3);
/// assert_eq!(message.shape(), &[3]);
/// assert!(message.iter().all(|x| *x == 1f64));
/// ```
#[inline]
pub fn initial(size: usize) -> Tensor {
    ArrayD::ones(IxDyn(&[size]))
}

/// Pointwise product of two tensors of the same shape
///
/// # Notes
///
/// No broadcasting is performed, differently shaped operands
/// result in `BNError::ShapeMismatch`
#[inline]
pub fn elementwise_multiply(lhs: &Tensor, rhs: &Tensor) -> BNResult<Tensor> {
    if lhs.shape() != rhs.shape() {
        return Err(BNError::ShapeMismatch {
            operation: "elementwise_multiply",
            expected: lhs.len(),
            actual: rhs.len(),
        });
    }
    Ok(lhs * rhs)
}

/// Multiplies a tensor by a vector along an axis and sums the axis out
///
/// # Arguments
///
/// * `tensor` - A contracted tensor
/// * `axis` - An axis being contracted
/// * `vector` - A 1-d tensor whose length equals the length of `axis`
///
/// # Notes
///
/// The resulting tensor has one axis less than `tensor`,
/// contraction of a 1-d tensor results in a 0-d tensor
///
/// # Example
///
/// ```
/// use bnrs::core::tensor::contract;
/// use ndarray::{ArrayD, IxDyn};
///
/// let tensor = ArrayD::from_shape_vec(IxDyn(&[1, 3]), vec![1., 2., 3.]).unwrap();
/// let vector = ArrayD::from_shape_vec(IxDyn(&[3]), vec![1., 2., 3.]).unwrap();
/// let result = contract(&tensor, 1, &vector).unwrap();
/// assert_eq!(result.shape(), &[1]);
/// assert_eq!(result[[0]], 14.);
/// ```
pub fn contract(tensor: &Tensor, axis: usize, vector: &Tensor) -> BNResult<Tensor> {
    if vector.ndim() != 1 {
        return Err(BNError::ShapeMismatch {
            operation: "contract",
            expected: 1,
            actual: vector.ndim(),
        });
    }
    if axis >= tensor.ndim() {
        return Err(BNError::ShapeMismatch {
            operation: "contract",
            expected: tensor.ndim(),
            actual: axis + 1,
        });
    }
    let axis_len = tensor.len_of(Axis(axis));
    if axis_len != vector.len() {
        return Err(BNError::ShapeMismatch {
            operation: "contract",
            expected: axis_len,
            actual: vector.len(),
        });
    }
    let mut shape = tensor.shape().to_vec();
    shape.remove(axis);
    let mut result = ArrayD::zeros(IxDyn(&shape));
    for (index, weight) in vector.iter().enumerate() {
        result.scaled_add(*weight, &tensor.index_axis(Axis(axis), index));
    }
    Ok(result)
}

/// Moves the last axis of a tensor to the front, other axes keep their order
///
/// # Example
///
/// ```
/// use bnrs::core::tensor::rotate_last_axis_to_front;
/// use ndarray::{ArrayD, IxDyn};
///
/// let tensor = ArrayD::from_shape_vec(IxDyn(&[3, 2]), vec![1., 2., 3., 4., 5., 6.]).unwrap();
/// let rotated = rotate_last_axis_to_front(&tensor);
/// assert_eq!(rotated.shape(), &[2, 3]);
/// assert_eq!(rotated.iter().copied().collect::<Vec<_>>(), vec![1., 3., 5., 2., 4., 6.]);
/// ```
pub fn rotate_last_axis_to_front(tensor: &Tensor) -> Tensor {
    let ndim = tensor.ndim();
    if ndim < 2 {
        return tensor.clone();
    }
    let mut axes = Vec::with_capacity(ndim);
    axes.push(ndim - 1);
    axes.extend(0..(ndim - 1));
    tensor
        .view()
        .permuted_axes(axes)
        .as_standard_layout()
        .into_owned()
}

/// Fixes an axis of a tensor to a single index
///
/// # Arguments
///
/// * `tensor` - A sliced tensor
/// * `axis` - An axis being fixed
/// * `index` - A position along `axis` that is kept
///
/// # Notes
///
/// The axis is not removed, its length becomes 1, so other axes
/// keep their positions
pub fn slice_axis(tensor: &Tensor, axis: usize, index: usize) -> BNResult<Tensor> {
    if axis >= tensor.ndim() {
        return Err(BNError::ShapeMismatch {
            operation: "slice_axis",
            expected: tensor.ndim(),
            actual: axis + 1,
        });
    }
    let axis_len = tensor.len_of(Axis(axis));
    if index >= axis_len {
        return Err(BNError::ShapeMismatch {
            operation: "slice_axis",
            expected: axis_len,
            actual: index + 1,
        });
    }
    Ok(tensor
        .slice_axis(Axis(axis), Slice::from(index..(index + 1)))
        .to_owned())
}

// ------------------------------------------------------------------------------------------

/// Computes a factor to variable message
///
/// # Arguments
///
/// * `tensor` - A factor's tensor
/// * `target_axis` - The axis of the receiving variable
/// * `incoming` - Variable to factor messages, one per axis; the entry
///     at `target_axis` is ignored and could be `None`
///
/// # Notes
///
/// Axes are processed from the last to the first one. A non target axis
/// is contracted while it is the last axis of the intermediate tensor;
/// on reaching the target axis the last axis is rotated to the front where
/// no further contraction touches it. The result is indexed along the
/// target variable's domain.
pub fn factor_to_variable(
    tensor: &Tensor,
    target_axis: usize,
    incoming: &[Option<&Tensor>],
) -> BNResult<Tensor> {
    if incoming.len() != tensor.ndim() || target_axis >= tensor.ndim() {
        return Err(BNError::ShapeMismatch {
            operation: "factor_to_variable",
            expected: tensor.ndim(),
            actual: incoming.len(),
        });
    }
    let mut result = tensor.clone();
    for (axis, message) in incoming.iter().copied().enumerate().rev() {
        if axis == target_axis {
            result = rotate_last_axis_to_front(&result);
            continue;
        }
        let message = message.ok_or(BNError::ShapeMismatch {
            operation: "factor_to_variable",
            expected: 1,
            actual: 0,
        })?;
        let last = result.ndim() - 1;
        result = contract(&result, last, message)?;
    }
    Ok(result)
}

/// Contracts every axis of a tensor against its message, returning a scalar
pub fn contract_all(tensor: &Tensor, incoming: &[&Tensor]) -> BNResult<f64> {
    if incoming.len() != tensor.ndim() {
        return Err(BNError::ShapeMismatch {
            operation: "contract_all",
            expected: tensor.ndim(),
            actual: incoming.len(),
        });
    }
    let mut result = tensor.clone();
    for message in incoming.iter().rev() {
        let last = result.ndim() - 1;
        result = contract(&result, last, message)?;
    }
    Ok(result.sum())
}
