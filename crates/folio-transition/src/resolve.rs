use folio_surface::TransitionKind;

/// Resolve an order-dependent kind into a direction-bearing one.
///
/// `SlideByOrder` and `FlipByOrder` pick the reverse variant when the
/// outgoing surface sits after the incoming one in the declared order. With
/// no outgoing surface the forward variant is used. Other kinds pass
/// through unchanged.
pub fn resolve(
    requested: TransitionKind,
    outgoing_order: Option<usize>,
    incoming_order: usize,
) -> TransitionKind {
    let reverse = matches!(outgoing_order, Some(order) if order > incoming_order);

    match requested {
        TransitionKind::SlideByOrder if reverse => TransitionKind::SlideReverse,
        TransitionKind::SlideByOrder => TransitionKind::Slide,
        TransitionKind::FlipByOrder if reverse => TransitionKind::FlipReverse,
        TransitionKind::FlipByOrder => TransitionKind::Flip,
        kind => kind,
    }
}
