//! Registry behaviour exercised directly against a scene, without the app context
